//! # Tagger de Dicionário
//!
//! Compõe os estágios do motor em um componente de pipeline:
//!
//! 1. **Autômato** ([`crate::automaton`]): todas as ocorrências de nomes no texto.
//! 2. **Fronteiras** ([`crate::boundary`]): só ocorrências em fronteira de palavra.
//! 3. **Sobreposição** ([`crate::overlap`]): a ocorrência mais larga vence.
//! 4. **Desambiguação** ([`crate::disambiguate`]): opcional, por configuração.
//! 5. **Alinhamento** ([`crate::align`]): spans de token + filtro de substantivos.
//! 6. **Fusão** ([`crate::merge`]): commit no documento e retokenização.
//!
//! Os dois taggers do sistema (químicos e táxons) são o mesmo [`DictionaryTagger`]
//! com configurações diferentes.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::io::Cursor;
//! use dictag_core::{Document, DictionaryTagger, Tagger};
//!
//! let tagger = DictionaryTagger::chemical(Cursor::new("hydrogen\nhydrogen peroxide\n")).unwrap();
//! let mut doc = Document::from_text("Enzymes that decompose hydrogen peroxide are peroxidases.");
//! tagger.tag(&mut doc);
//! assert_eq!(doc.entity_texts(), vec!["hydrogen peroxide"]);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::align::align;
use crate::automaton::Automaton;
use crate::boundary::validate_all;
use crate::config::TaggerConfig;
use crate::dictionary::{load, LoadStats};
use crate::document::Document;
use crate::error::Result;
use crate::merge::{merge, MergeOutcome};
use crate::overlap::resolve;

/// Um componente que acrescenta entidades a um documento.
///
/// Implementações são imutáveis depois de construídas e podem ser compartilhadas
/// entre threads; o documento é emprestado com exclusividade durante a chamada.
pub trait Tagger: Send + Sync {
    fn name(&self) -> &str;

    /// Marca o documento no lugar. Nunca falha: conflitos ficam no relatório.
    fn tag(&self, document: &mut Document) -> TagReport;
}

/// Contadores de cada estágio para uma chamada de [`Tagger::tag`].
///
/// As perdas aceitas (anotações desalinhadas, palavras ambíguas, conflitos) ficam
/// visíveis aqui em vez de desaparecerem silenciosamente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagReport {
    pub tagger: String,
    pub raw_matches: usize,
    /// Ocorrências que passaram pela validação de fronteira.
    pub annotations: usize,
    /// Anotações restantes após a resolução de sobreposição.
    pub resolved: usize,
    pub disambiguated: usize,
    pub misaligned: usize,
    pub noun_filtered: usize,
    pub outcome: MergeOutcome,
}

impl TagReport {
    /// Número de entidades confirmadas por esta chamada.
    pub fn committed(&self) -> usize {
        match self.outcome {
            MergeOutcome::Committed { committed, .. } => committed,
            _ => 0,
        }
    }

    pub fn conflict(&self) -> bool {
        self.outcome == MergeOutcome::Conflict
    }
}

/// Tagger baseado em um autômato de dicionário.
#[derive(Debug, Clone)]
pub struct DictionaryTagger {
    automaton: Automaton,
    config: TaggerConfig,
}

impl DictionaryTagger {
    /// Constrói a partir de um autômato já compilado.
    pub fn new(automaton: Automaton, config: TaggerConfig) -> Self {
        Self { automaton, config }
    }

    /// Lê o dicionário e compila o autômato.
    pub fn from_reader<R: BufRead>(reader: R, config: TaggerConfig) -> Result<Self> {
        Ok(Self::from_reader_with_stats(reader, config)?.0)
    }

    /// Como [`DictionaryTagger::from_reader`], devolvendo também as estatísticas de carga.
    pub fn from_reader_with_stats<R: BufRead>(reader: R, config: TaggerConfig) -> Result<(Self, LoadStats)> {
        let (builder, stats) = load(reader, &config)?;
        let automaton = builder.finalize()?;
        Ok((Self::new(automaton, config), stats))
    }

    pub fn from_path(path: impl AsRef<Path>, config: TaggerConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }

    /// Tagger de químicos (um nome por linha).
    pub fn chemical<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader(reader, TaggerConfig::chemical())
    }

    /// Tagger de táxons (identificador e variantes por linha).
    pub fn taxon<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader(reader, TaggerConfig::taxon())
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}

impl Tagger for DictionaryTagger {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn tag(&self, document: &mut Document) -> TagReport {
        let config = &self.config;
        let text = document.text.as_str();

        let mut raw_matches = 0;
        let raws = self.automaton.matches_ending_at(text).inspect(|_| raw_matches += 1);
        let annotations = validate_all(text, raws, config.allow_plural);
        let validated = annotations.len();

        let mut annotations = resolve(annotations);
        let resolved = annotations.len();
        let disambiguated = config.disambiguation.apply(&mut annotations);

        let alignment = align(
            &annotations,
            text,
            &document.tokens,
            &config.label,
            &config.ambiguous_words,
        );
        let misaligned = alignment.misaligned;
        let noun_filtered = alignment.noun_filtered;

        let outcome = merge(document, alignment.spans);

        let report = TagReport {
            tagger: config.name.clone(),
            raw_matches,
            annotations: validated,
            resolved,
            disambiguated,
            misaligned,
            noun_filtered,
            outcome,
        };
        debug!(?report, "documento marcado");
        report
    }
}
