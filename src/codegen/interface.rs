use async_trait::async_trait;

use crate::error::AppError;

/// Text-to-code generation seam.
#[async_trait]
pub trait CodeGenerator: Send + Sync {
    /// Turns an English description into a code string.
    async fn generate(&self, english_text: &str) -> Result<String, AppError>;
}
