//! Firebase Realtime Database REST store

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::application::errors::StoreError;
use crate::domain::traits::DocumentStore;

/// Document store speaking the Realtime Database REST protocol:
/// `GET|POST|PATCH|DELETE {base}/{path}.json`
pub struct FirebaseStore {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
}

/// Body returned by a push
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

impl FirebaseStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
            client: Client::new(),
        }
    }

    pub fn with_auth(mut self, token: Option<String>) -> Self {
        self.auth_token = token.filter(|t| !t.is_empty());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.auth_token {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }
}

#[async_trait]
impl DocumentStore for FirebaseStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let response = self.request(Method::GET, path).send().await?;
        let value: Value = Self::check(response).await?.json().await?;
        Ok(if value.is_null() { None } else { Some(value) })
    }

    async fn push(&self, collection: &str, value: &Value) -> Result<String, StoreError> {
        let response = self
            .request(Method::POST, collection)
            .json(value)
            .send()
            .await?;
        let pushed: PushResponse = Self::check(response).await?.json().await?;
        tracing::debug!("Pushed {}/{}", collection, pushed.name);
        Ok(pushed.name)
    }

    async fn patch(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        let response = self
            .request(Method::PATCH, path)
            .json(value)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let store = FirebaseStore::new("https://example-rtdb.firebaseio.com/");
        assert_eq!(store.url("softwares"), "https://example-rtdb.firebaseio.com/softwares.json");
        assert_eq!(store.url("/softwares/-Nabc/"), "https://example-rtdb.firebaseio.com/softwares/-Nabc.json");
    }

    #[test]
    fn test_auth_token_is_query_encoded() {
        let store = FirebaseStore::new("https://db.test").with_auth(Some("a&b=c/d ?".to_string()));
        let request = store.request(Method::GET, "visitors").build().unwrap();
        assert_eq!(request.url().path(), "/visitors.json");
        let pairs: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("auth".to_string(), "a&b=c/d ?".to_string())]);

        let store = FirebaseStore::new("https://db.test").with_auth(Some(String::new()));
        let request = store.request(Method::DELETE, "visitors").build().unwrap();
        assert_eq!(request.url().query(), None);
    }
}
