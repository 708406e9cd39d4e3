use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AppError;
use crate::language::Language;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CodeGenerationRequest {
    pub query: String,
    /// Language selector, `"english"` or `"spanish"` in any case. Field
    /// name is the Spanish wire name the frontend sends.
    pub idioma: String,
}

#[derive(Debug, Serialize)]
pub struct CodeGenerationResponse {
    /// Original query when it was Spanish, empty for English requests.
    #[serde(rename = "textES")]
    pub text_es: String,
    #[serde(rename = "textEN")]
    pub text_en: String,
    #[serde(rename = "generateCode")]
    pub generate_code: String,
}

pub async fn translate_to_code(
    State(state): State<AppState>,
    Json(request): Json<CodeGenerationRequest>,
) -> Result<Json<CodeGenerationResponse>, AppError> {
    debug!(query = %request.query, idioma = %request.idioma, "code generation request");
    let language: Language = request.idioma.parse()?;

    let response = match language {
        Language::English => {
            let code = state.code_generator.generate(&request.query).await?;
            CodeGenerationResponse {
                text_es: String::new(),
                text_en: request.query,
                generate_code: code,
            }
        }
        Language::Spanish => {
            let english = state.translator.translate(&request.query).await?;
            let code = state.code_generator.generate(&english).await?;
            CodeGenerationResponse {
                text_es: request.query,
                text_en: english,
                generate_code: code,
            }
        }
    };

    debug!(text_en = %response.text_en, "generated code response");
    Ok(Json(response))
}

pub async fn index() -> Html<&'static str> {
    Html(include_str!("../frontend/index.html"))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let inference_healthy = state.inference.health_check().await.unwrap_or(false);
    Json(json!({
        "status": "ok",
        "inference_service": inference_healthy
    }))
}
