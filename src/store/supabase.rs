use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::{Query, Row, Store, StoreError};
use crate::config::StoreSettings;

/// Talks to a Supabase project: PostgREST for tables, Storage for objects.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    key: String,
}

impl SupabaseStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: settings.url.trim().trim_end_matches('/').to_string(),
            key: settings.service_key.trim().to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket,
            encode_path(path)
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }
}

#[async_trait]
impl Store for SupabaseStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, StoreError> {
        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&query_pairs(query))
            .send()
            .await?;
        read_rows(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Row, StoreError> {
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        read_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Option<Row>, StoreError> {
        let response = self
            .authorized(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&id_filter(id))
            .json(&patch)
            .send()
            .await?;
        Ok(read_rows(response).await?.into_iter().next())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.delete(self.table_url(table)))
            .query(&id_filter(id))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let response = self
            .authorized(self.client.post(self.object_url(bucket, name)))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        check(response).await?;
        Ok(name.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            encode_path(path)
        )
    }
}

fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    for (column, value) in &query.filters {
        pairs.push((column.clone(), format!("eq.{value}")));
    }
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }
    pairs
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message: error_message(&body, status),
    })
}

async fn read_rows(response: Response) -> Result<Vec<Row>, StoreError> {
    check(response)
        .await?
        .json::<Vec<Row>>()
        .await
        .map_err(|err| StoreError::Decode(err.to_string()))
}

/// Pulls the human-readable message out of a PostgREST or Storage error body.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["message", "error_description", "error", "msg"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("store request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new(&StoreSettings {
            url: "https://demo.supabase.co/".to_string(),
            service_key: "key".to_string(),
            upload_bucket: "gallery-images".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn urls_drop_trailing_slash() {
        let store = store();
        assert_eq!(store.table_url("offers"), "https://demo.supabase.co/rest/v1/offers");
        assert_eq!(
            store.object_url("gallery-images", "17-front desk.png"),
            "https://demo.supabase.co/storage/v1/object/gallery-images/17-front%20desk.png"
        );
    }

    #[test]
    fn public_url_points_at_public_bucket() {
        assert_eq!(
            store().public_url("gallery-images", "1700000000000-chair.jpg"),
            "https://demo.supabase.co/storage/v1/object/public/gallery-images/1700000000000-chair.jpg"
        );
    }

    #[test]
    fn query_pairs_follow_postgrest_syntax() {
        let query = Query::new().eq("is_active", "true").newest_first();
        let pairs = query_pairs(&query);
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("is_active".to_string(), "eq.true".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn error_message_prefers_json_message() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.offerz\" does not exist"}"#;
        assert_eq!(
            error_message(body, StatusCode::NOT_FOUND),
            "relation \"public.offerz\" does not exist"
        );

        let storage = r#"{"statusCode":"403","error":"Unauthorized","message":"new row violates row-level security policy"}"#;
        assert_eq!(
            error_message(storage, StatusCode::BAD_REQUEST),
            "new row violates row-level security policy"
        );
    }

    #[test]
    fn error_message_falls_back_to_body_then_reason() {
        assert_eq!(error_message("  gateway down ", StatusCode::BAD_GATEWAY), "gateway down");
        assert_eq!(error_message("", StatusCode::BAD_GATEWAY), "Bad Gateway");
    }
}
