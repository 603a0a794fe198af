use crate::api::model::{
    CacheCleared, CompareRequest, ComparisonResult, ErrorBody, HealthStatus, ModelCatalog,
    SampleText,
};
use crate::api::BattleApi;
use crate::errors::{ApiError, TransportError};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

pub struct HttpBattleApi {
    base_url: String,
    client: Client,
}

impl HttpBattleApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, TransportError> {
        tracing::debug!(%path, "sending request");
        let resp = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let error = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error)
                .filter(|message| !message.trim().is_empty());
            tracing::warn!(%path, status = status.as_u16(), server_error = ?error, "request failed");
            return Err(TransportError::Status {
                status: status.as_u16(),
                error,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.send(path, self.client.get(self.url(path))).await
    }
}

fn wrap(action: &'static str) -> impl FnOnce(TransportError) -> ApiError {
    move |e| ApiError::Request {
        action,
        detail: e.to_string(),
    }
}

impl BattleApi for HttpBattleApi {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let unreachable = |detail: String| {
            tracing::warn!(error = %detail, base_url = %self.base_url, "health check failed");
            ApiError::Unreachable
        };
        let resp = self
            .client
            .get(self.url("health"))
            .send()
            .await
            .map_err(|e| unreachable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(unreachable(format!(
                "request failed with status code {}",
                status.as_u16()
            )));
        }
        // Only the status matters; the payload is kept when it happens to be JSON.
        let body = resp.text().await.unwrap_or_default();
        Ok(HealthStatus(
            serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
        ))
    }

    async fn get_available_models(&self) -> Result<ModelCatalog, ApiError> {
        self.get("models").await.map_err(wrap("fetch models"))
    }

    async fn get_sample_texts(&self) -> Result<Vec<SampleText>, ApiError> {
        self.get("sample-texts")
            .await
            .map_err(wrap("fetch sample texts"))
    }

    async fn get_sample_text_by_id(&self, id: u32) -> Result<SampleText, ApiError> {
        self.get(&format!("sample-texts/{id}"))
            .await
            .map_err(wrap("fetch sample text"))
    }

    async fn compare_summaries(
        &self,
        request: &CompareRequest,
    ) -> Result<ComparisonResult, ApiError> {
        let path = "summarize";
        let builder = self.client.post(self.url(path)).json(request);
        self.send(path, builder).await.map_err(|e| match e {
            TransportError::Status {
                error: Some(message),
                ..
            } => ApiError::Server(message),
            other => wrap("generate summaries")(other),
        })
    }

    async fn clear_model_cache(&self) -> Result<CacheCleared, ApiError> {
        let path = "clear-cache";
        self.send(path, self.client.post(self.url(path)))
            .await
            .map_err(wrap("clear cache"))
    }
}
