//! Seed DDL for the store database.
//!
//! Everything is `IF NOT EXISTS` so the seed can run on every startup: first
//! boot creates the database, user and table, later boots are no-ops.

/// DDL for the database and the `stores` table. `{db}` is the database name.
///
/// All columns except the primary key are nullable; duplicates are allowed by
/// design, so there are no unique constraints beyond the key.
pub fn seed_ddl(db: &str) -> String {
    format!(
        r#"
CREATE DATABASE IF NOT EXISTS {db} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci;

CREATE TABLE IF NOT EXISTS {db}.stores (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    name TEXT NULL,
    phone TEXT NULL,
    email TEXT NULL,
    prefecture TEXT NULL,
    city TEXT NULL,
    street_address TEXT NULL,
    building TEXT NULL,
    url TEXT NULL,
    ssl BOOLEAN DEFAULT FALSE
)
"#
    )
}

/// DDL for the access user the collection script connects as, one statement
/// per element so credentials never pass through [`statements`] splitting.
///
/// MySQL does not accept bind parameters in DDL, so the credentials are
/// interpolated with single quotes doubled.
pub fn access_user_ddl(db: &str, user: &str, password: &str) -> Vec<String> {
    let user = quote_literal(user);
    let password = quote_literal(password);
    vec![
        format!("CREATE USER IF NOT EXISTS '{user}'@'%' IDENTIFIED BY '{password}'"),
        format!("GRANT SELECT, INSERT ON {db}.* TO '{user}'@'%'"),
        "FLUSH PRIVILEGES".to_string(),
    ]
}

fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Split a multi-statement script into individual statements, since
/// `sqlx::query` executes one statement at a time.
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ddl_is_idempotent_by_construction() {
        let ddl = seed_ddl("gurunavi");
        assert!(ddl.contains("CREATE DATABASE IF NOT EXISTS gurunavi"));
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS gurunavi.stores"));

        let users = access_user_ddl("gurunavi", "scraper", "secret");
        assert!(users[0].contains("CREATE USER IF NOT EXISTS 'scraper'@'%'"));
        assert!(users[1].contains("GRANT SELECT, INSERT ON gurunavi.*"));
        assert_eq!(users[2], "FLUSH PRIVILEGES");
    }

    #[test]
    fn credentials_with_quotes_and_semicolons_stay_one_statement() {
        let users = access_user_ddl("gurunavi", "scraper", "it's;secret");
        assert_eq!(users.len(), 3);
        assert!(users[0].contains("IDENTIFIED BY 'it''s;secret'"));
    }

    #[test]
    fn statements_drop_blanks_between_semicolons() {
        let stmts: Vec<&str> = statements("A;\n\nB;;\n").collect();
        assert_eq!(stmts, vec!["A", "B"]);
    }

    #[test]
    fn every_non_key_column_is_nullable() {
        let ddl = seed_ddl("gurunavi");
        for col in [
            "name", "phone", "email", "prefecture", "city", "street_address", "building", "url",
        ] {
            assert!(ddl.contains(&format!("{col} TEXT NULL")), "column {col}");
        }
        assert!(ddl.contains("ssl BOOLEAN DEFAULT FALSE"));
    }
}
