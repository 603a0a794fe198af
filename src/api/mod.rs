use crate::errors::ApiError;
use std::future::Future;

pub mod model;

mod http;

pub use http::HttpBattleApi;
pub use model::{
    CacheCleared, CompareRequest, ComparisonResult, HealthStatus, ModelCatalog, SampleText, Side,
};

/// The backend surface the client consumes. Every call is a single request
/// with no retry; any failure comes back as one displayable [`ApiError`].
pub trait BattleApi: Send + Sync {
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, ApiError>> + Send;

    fn get_available_models(&self) -> impl Future<Output = Result<ModelCatalog, ApiError>> + Send;

    fn get_sample_texts(&self) -> impl Future<Output = Result<Vec<SampleText>, ApiError>> + Send;

    fn get_sample_text_by_id(
        &self,
        id: u32,
    ) -> impl Future<Output = Result<SampleText, ApiError>> + Send;

    fn compare_summaries(
        &self,
        request: &CompareRequest,
    ) -> impl Future<Output = Result<ComparisonResult, ApiError>> + Send;

    fn clear_model_cache(&self) -> impl Future<Output = Result<CacheCleared, ApiError>> + Send;
}
