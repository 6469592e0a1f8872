use crate::domain::translation::{TranslationRequest, TranslationResponse};
use crate::error::AppResult;
use async_trait::async_trait;

/// Repository for machine translation.
///
/// Implementations split long text to fit provider limits and return one
/// translation per requested target.
#[async_trait]
pub trait TranslatorRepository: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> AppResult<TranslationResponse>;
}
