//! # dictag-core — Marcação de Entidades por Dicionário
//!
//! Este crate marca trechos de texto com rótulos vindos de dicionários (nomes de
//! substâncias químicas, nomes de táxons) dentro de um pipeline maior de análise de
//! documentos. Tokens, offsets e classes gramaticais vêm do pipeline de NLP externo;
//! o motor só lê esses dados e atualiza o conjunto de entidades do documento.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Autômato** ([`automaton`]): Aho-Corasick sobre `nome -> rótulos`, todas as ocorrências em uma passada.
//! 2.  **Fronteiras** ([`boundary`]): descarta ocorrências no meio de palavras (com exceção do plural em `s`).
//! 3.  **Sobreposição** ([`overlap`]): ordena (início ↑, fim ↓) e mantém a ocorrência mais larga.
//! 4.  **Desambiguação** ([`disambiguate`]): restringe nomes ambíguos pela evidência do próprio documento.
//! 5.  **Alinhamento** ([`align`]): converte offsets de caractere em spans de token e filtra palavras comuns.
//! 6.  **Fusão** ([`merge`]): combina com entidades de taggers anteriores (o mais novo vence) e retokeniza.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::io::Cursor;
//! use dictag_core::{DictionaryTagger, Document, TaggingPipeline};
//!
//! let chemicals = DictionaryTagger::chemical(Cursor::new("water\nnitrogen\n")).unwrap();
//! let taxa = DictionaryTagger::taxon(Cursor::new("NCBITaxon:89462\twater buffalo\n")).unwrap();
//! let pipeline = TaggingPipeline::new().with(chemicals).with(taxa);
//!
//! let mut doc = Document::from_text("A water buffalo is more common than a nitrogen buffalo.");
//! pipeline.process(&mut doc);
//!
//! assert_eq!(doc.entity_texts(), vec!["water buffalo", "nitrogen"]);
//! ```

pub mod align;
pub mod automaton;
pub mod boundary;
pub mod config;
pub mod dictionary;
pub mod disambiguate;
pub mod document;
pub mod error;
pub mod merge;
pub mod overlap;
pub mod pipeline;
pub mod tagger;
pub mod tokenizer;

pub use automaton::{Automaton, DictionaryBuilder, LabelSet, RawMatch};
pub use boundary::Annotation;
pub use config::TaggerConfig;
pub use dictionary::DictionaryFormat;
pub use disambiguate::Disambiguation;
pub use document::{Document, EntitySpan, Pos, Token};
pub use error::{DictagError, Result};
pub use merge::{EntitySet, MergeOutcome};
pub use pipeline::TaggingPipeline;
pub use tagger::{DictionaryTagger, TagReport, Tagger};
