use async_trait::async_trait;

use crate::error::AppError;

/// Spanish-to-English translation seam.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Returns the best English translation of `text`.
    async fn translate(&self, text: &str) -> Result<String, AppError>;
}
