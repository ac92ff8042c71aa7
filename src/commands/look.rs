//! Look Commands
//!
//! REST calls for claimed looks: POST the root to create, GET/PUT/DELETE a
//! single look by id. Bodies are the flat look record.

use serde_json::Value;

use super::resource_url;
use crate::error::LookResult;

// ========================
// Commands
// ========================

pub async fn create_look(client: &reqwest::Client, url_root: &str, record: &Value) -> LookResult<Value> {
    let response = client.post(url_root).json(record).send().await?;
    read_record(response, record).await
}

pub async fn fetch_look(client: &reqwest::Client, url_root: &str, id: u64) -> LookResult<Value> {
    let response = client.get(resource_url(url_root, id)).send().await?;
    read_record(response, &Value::Null).await
}

pub async fn update_look(client: &reqwest::Client, url_root: &str, id: u64, record: &Value) -> LookResult<Value> {
    let response = client.put(resource_url(url_root, id)).json(record).send().await?;
    read_record(response, record).await
}

pub async fn delete_look(client: &reqwest::Client, url_root: &str, id: u64, record: &Value) -> LookResult<Value> {
    let response = client.delete(resource_url(url_root, id)).send().await?;
    read_record(response, record).await
}

/// Non-2xx is a transport failure. An empty body answers with `sent`.
async fn read_record(response: reqwest::Response, sent: &Value) -> LookResult<Value> {
    let response = response.error_for_status()?;
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(sent.clone());
    }
    Ok(serde_json::from_str(&body)?)
}
