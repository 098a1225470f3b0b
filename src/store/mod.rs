//! Access to the hosted backend that owns every table and uploaded object.
//!
//! Handlers only ever talk to [`Store`]; the production implementation is
//! [`supabase::SupabaseStore`].

use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod supabase;

#[cfg(test)]
pub mod memory;

/// A row as returned by the store. The application treats rows as opaque.
pub type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The store answered with an error; `message` is relayed to callers verbatim.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response from store: {0}")]
    Decode(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Equality filters and ordering for a table read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = Some(Order {
            column: "created_at".to_string(),
            ascending: false,
        });
        self
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError>;

    /// Inserts one row and returns it as stored.
    async fn insert(&self, table: &str, row: Value) -> Result<Row, StoreError>;

    /// Applies `patch` to the row with `id`. `None` when nothing matched.
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Option<Row>, StoreError>;

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;

    /// Stores an object and returns its path inside `bucket`.
    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}
