use serde::{Deserialize, Serialize};

/// A persisted store row. Only the identifier is guaranteed present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreRow {
    pub id: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub street_address: Option<String>,
    pub building: Option<String>,
    pub url: Option<String>,
    pub ssl: bool,
}

/// A store record to insert. Every field may be omitted; `ssl` falls back to
/// false, matching the column default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewStore {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ssl: bool,
}
