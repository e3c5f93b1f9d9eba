use crate::config::Config;
use crate::db::models::{NewStore, StoreRow};
use crate::db::schema;
use crate::error::GateError;
use crate::service::orchestrator::Backend;
use crate::service::readiness::wait_until_ready;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{Connection, MySqlPool, Row, mysql::MySqlConnection};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// One liveness probe: connect and ping, then drop the connection. A refused
/// or half-started server fails at either stage.
pub async fn ping(url: &Url) -> Result<(), sqlx::Error> {
    let mut conn = MySqlConnection::connect(url.as_str()).await?;
    conn.ping().await?;
    conn.close().await
}

/// Storage layer over the `stores` table.
///
/// The pool is opened against the server with no database selected, because
/// the application database may not exist yet when seeding runs; every query
/// qualifies the table with the database name instead.
#[derive(Clone)]
pub struct StoreStorage {
    pool: MySqlPool,
    db: String,
}

impl StoreStorage {
    pub async fn connect(server_url: &Url, db: &str) -> Result<Self, GateError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(4)
            .connect(server_url.as_str())
            .await?;
        Ok(Self {
            pool,
            db: db.to_string(),
        })
    }

    /// Apply the seed DDL: database, table, access user. Safe to re-run.
    pub async fn init_schema(&self, user: &str, password: &str) -> Result<(), GateError> {
        let seed = schema::seed_ddl(&self.db);
        for stmt in schema::statements(&seed) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        for stmt in schema::access_user_ddl(&self.db, user, password) {
            sqlx::query(&stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Set the session character encoding on the pool's connections.
    pub async fn set_session_charset(&self) -> Result<(), GateError> {
        sqlx::query("SET NAMES utf8mb4").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn insert(&self, store: &NewStore) -> Result<i64, GateError> {
        let sql = format!(
            r#"INSERT INTO {db}.stores
               (name, phone, email, prefecture, city, street_address, building, url, ssl)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            db = self.db
        );
        let result = sqlx::query(&sql)
            .bind(&store.name)
            .bind(&store.phone)
            .bind(&store.email)
            .bind(&store.prefecture)
            .bind(&store.city)
            .bind(&store.street_address)
            .bind(&store.building)
            .bind(&store.url)
            .bind(store.ssl)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_id() as i64)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<StoreRow, GateError> {
        let sql = format!(
            r#"SELECT id, name, phone, email, prefecture, city, street_address, building, url, ssl
               FROM {db}.stores WHERE id = ?"#,
            db = self.db
        );
        let row = sqlx::query(&sql).bind(id).fetch_one(&self.pool).await?;
        Self::row_to_model(row)
    }

    pub async fn count(&self) -> Result<i64, GateError> {
        let sql = format!("SELECT COUNT(*) FROM {db}.stores", db = self.db);
        let rec: (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(rec.0)
    }

    fn row_to_model(row: MySqlRow) -> Result<StoreRow, GateError> {
        // `ssl` is a nullable column with a FALSE default; read NULL as false.
        let ssl: Option<bool> = row.try_get("ssl")?;
        Ok(StoreRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            prefecture: row.try_get("prefecture")?,
            city: row.try_get("city")?,
            street_address: row.try_get("street_address")?,
            building: row.try_get("building")?,
            url: row.try_get("url")?,
            ssl: ssl.unwrap_or(false),
        })
    }
}

/// MySQL-backed side of the startup pipeline: readiness probing, seeding and
/// session configuration against a real server.
pub struct MySqlGate {
    server_url: Url,
    db: String,
    app_user: String,
    app_password: String,
}

impl MySqlGate {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            server_url: cfg.server_url(),
            db: cfg.database_name().to_string(),
            app_user: cfg.app_user.clone(),
            app_password: cfg.app_password.clone(),
        }
    }
}

impl Backend for MySqlGate {
    async fn await_ready(&self, interval: Duration, max_attempts: usize) -> Result<(), GateError> {
        wait_until_ready(|| ping(&self.server_url), interval, max_attempts).await
    }

    async fn provision(&self) -> Result<(), GateError> {
        let storage = StoreStorage::connect(&self.server_url, &self.db).await?;
        storage.init_schema(&self.app_user, &self.app_password).await?;
        debug!(db = %self.db, "seed DDL applied");
        Ok(())
    }

    async fn configure_session(&self) -> Result<(), GateError> {
        let storage = StoreStorage::connect(&self.server_url, &self.db).await?;
        storage.set_session_charset().await
    }
}
