//! In-process [`Store`] used by the HTTP tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use super::{Query, Row, Store, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with `message`, the way a misconfigured project would.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        for row in rows {
            self.put(table, row);
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<(String, Vec<u8>)> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{path}"))
            .cloned()
    }

    fn put(&self, table: &str, row: Value) -> Row {
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut row = match row {
            Value::Object(map) => map,
            other => {
                let mut map = Row::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        row.entry("id").or_insert_with(|| Value::from(seq));
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seq as i64);
        row.entry("created_at")
            .or_insert_with(|| Value::String(created_at.to_rfc3339()));
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(StoreError::Rejected {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_id(row: &Row, id: &str) -> bool {
    row.get("id").map(text).as_deref() == Some(id)
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        self.enter()?;
        let mut rows: Vec<Row> = self
            .rows(table)
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| row.get(column).map(text).as_deref() == Some(value))
            })
            .collect();
        if let Some(order) = &query.order {
            rows.sort_by_key(|row| row.get(&order.column).map(text).unwrap_or_default());
            if !order.ascending {
                rows.reverse();
            }
        }
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Row, StoreError> {
        self.enter()?;
        Ok(self.put(table, row))
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Option<Row>, StoreError> {
        self.enter()?;
        let mut tables = self.tables.lock().unwrap();
        let Some(row) = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| matches_id(row, id)))
        else {
            return Ok(None);
        };
        if let Value::Object(fields) = patch {
            row.extend(fields);
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        self.enter()?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|row| !matches_id(row, id));
        }
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.enter()?;
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{bucket}/{name}"), (content_type.to_string(), bytes));
        Ok(name.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://storage.test/public/{bucket}/{path}")
    }
}
