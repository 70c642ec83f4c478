use std::time::Duration;

use anyhow::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Where completions are requested from and how the caller
/// identifies itself. OpenRouter uses the referer and title headers
/// for app attribution; other OpenAI compatible hosts ignore them.
#[derive(Clone, Debug)]
pub struct Endpoint {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
    pub referer: Option<String>,
    pub title: Option<String>,
}

impl Endpoint {
    fn attribution_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let pairs = [("http-referer", &self.referer), ("x-title", &self.title)];
        for (name, value) in pairs {
            let Some(value) = value else { continue };
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(HeaderName::from_static(name), v);
                }
                Err(e) => tracing::warn!("Skipping invalid {} header: {}", name, e),
            }
        }
        headers
    }
}

pub async fn completion(messages: &[Message], endpoint: &Endpoint) -> Result<Value, Error> {
    let payload = json!({
        "model": endpoint.model,
        "messages": messages,
    });
    let url = format!(
        "{}/v1/chat/completions",
        endpoint.api_hostname.trim_end_matches("/")
    );
    tracing::debug!("Requesting completion from {} with model {}", url, endpoint.model);

    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(&endpoint.api_key)
        .header("Content-Type", "application/json")
        .headers(endpoint.attribution_headers())
        .timeout(Duration::from_secs(60 * 2))
        .json(&payload)
        .send()
        .await?
        .json()
        .await?;

    Ok(response)
}
