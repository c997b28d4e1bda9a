//! Servidor HTTP Axum de demonstração para o tagger de dicionário
//!
//! Variáveis de ambiente:
//! - `DICTAG_CHEMICALS`: dicionário de químicos (um nome por linha)
//! - `DICTAG_TAXA`: dicionário de táxons (identificador TAB variantes)
//! - `DICTAG_TAGGERS`: arquivo JSON com uma lista de `{ "path": ..., "config": {...} }`
//! - `DICTAG_ADDR`: endereço de escuta (padrão `0.0.0.0:3000`)
//! - `RUST_LOG`: filtro de log (padrão `info`)

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use dictag_core::{
    DictionaryTagger, Document, TagReport, TaggerConfig, TaggingPipeline, Token,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: TaggingPipeline,
}

#[derive(Deserialize)]
struct TagRequest {
    text: String,
    /// Tokens do pipeline de NLP; sem eles usa o tokenizador de fallback
    #[serde(default)]
    tokens: Option<Vec<Token>>,
}

#[derive(Serialize)]
struct TagResponse {
    document: Document,
    reports: Vec<TagReport>,
    processing_ms: u64,
}

#[derive(Deserialize)]
struct TaggerSource {
    path: PathBuf,
    #[serde(default)]
    config: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pipeline = build_pipeline()?;
    if pipeline.is_empty() {
        warn!("nenhum dicionário configurado; defina DICTAG_CHEMICALS e/ou DICTAG_TAXA");
    }
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/tag", post(tag_handler))
        .layer(cors)
        .with_state(state);

    let addr = std::env::var("DICTAG_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("não foi possível escutar em {addr}"))?;
    info!("Servidor dictag iniciado em http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Monta o pipeline na ordem: químicos, táxons, depois os taggers de `DICTAG_TAGGERS`.
fn build_pipeline() -> anyhow::Result<TaggingPipeline> {
    let mut pipeline = TaggingPipeline::new();

    if let Ok(path) = std::env::var("DICTAG_CHEMICALS") {
        let tagger = DictionaryTagger::from_path(&path, TaggerConfig::chemical())
            .with_context(|| format!("falha ao carregar químicos de {path}"))?;
        pipeline.add(tagger);
    }
    if let Ok(path) = std::env::var("DICTAG_TAXA") {
        let tagger = DictionaryTagger::from_path(&path, TaggerConfig::taxon())
            .with_context(|| format!("falha ao carregar táxons de {path}"))?;
        pipeline.add(tagger);
    }
    if let Ok(path) = std::env::var("DICTAG_TAGGERS") {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("falha ao ler {path}"))?;
        let sources: Vec<TaggerSource> = serde_json::from_str(&json)?;
        for source in sources {
            let config = match source.config {
                Some(value) => TaggerConfig::from_json_value(value)?,
                None => TaggerConfig::default(),
            };
            let tagger = DictionaryTagger::from_path(&source.path, config)
                .with_context(|| format!("falha ao carregar {}", source.path.display()))?;
            pipeline.add(tagger);
        }
    }
    Ok(pipeline)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "taggers": state.pipeline.names(),
    }))
}

/// Marca um documento (sem streaming)
async fn tag_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TagRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let mut document = match req.tokens {
        Some(tokens) => {
            if let Err(message) = check_tokens(&req.text, &tokens) {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(serde_json::json!({ "error": message })),
                )
                    .into_response();
            }
            Document::new(req.text, tokens)
        }
        None => Document::from_text(req.text),
    };

    // O pipeline é síncrono e CPU-bound: roda fora do runtime
    let result = tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let reports = state.pipeline.process(&mut document);
        TagResponse {
            document,
            reports,
            processing_ms: start.elapsed().as_millis() as u64,
        }
    })
    .await;

    match result {
        Ok(response) => {
            info!(
                entities = response.document.entities.len(),
                ms = response.processing_ms,
                "documento marcado"
            );
            Json(response).into_response()
        }
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

/// Tokens externos devem cair em fronteiras de caractere, em ordem e sem sobreposição
fn check_tokens(text: &str, tokens: &[Token]) -> Result<(), String> {
    let mut previous_end = 0;
    for token in tokens {
        if token.start > token.end
            || token.end > text.len()
            || !text.is_char_boundary(token.start)
            || !text.is_char_boundary(token.end)
        {
            return Err(format!("token fora do texto: {:?} [{}, {})", token.text, token.start, token.end));
        }
        if token.start < previous_end {
            return Err(format!("tokens fora de ordem ou sobrepostos em {}", token.start));
        }
        previous_end = token.end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tokens() {
        let text = "lead mine";
        let good = Document::from_text(text).tokens;
        assert!(check_tokens(text, &good).is_ok());

        let mut reversed = good.clone();
        reversed.reverse();
        assert!(check_tokens(text, &reversed).is_err());

        let mut outside = good;
        outside[1].end = 42;
        assert!(check_tokens(text, &outside).is_err());
    }
}
