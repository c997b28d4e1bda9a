//! # Erros do motor de marcação
//!
//! Apenas a construção (leitura de dicionários, configuração, compilação do
//! autômato) pode falhar de forma propagável. A busca é total e os conflitos de
//! commit são tratados localmente pelo [`crate::merge`], que usa
//! [`DictagError::SpanConflict`] só como sinal interno.

use thiserror::Error;

use crate::document::EntitySpan;

#[derive(Debug, Error)]
pub enum DictagError {
    #[error("falha de I/O ao ler dicionário: {0}")]
    Io(#[from] std::io::Error),

    #[error("falha ao compilar o autômato: {0}")]
    AutomatonBuild(#[from] aho_corasick::BuildError),

    #[error("configuração inválida: {0}")]
    Config(#[from] serde_json::Error),

    /// Dois spans disputam os mesmos tokens no momento do commit.
    #[error(
        "conflito de spans: '{}' [{}, {}) e '{}' [{}, {})",
        .first.text, .first.start_token, .first.end_token,
        .second.text, .second.start_token, .second.end_token
    )]
    SpanConflict {
        first: Box<EntitySpan>,
        second: Box<EntitySpan>,
    },
}

pub type Result<T> = std::result::Result<T, DictagError>;
