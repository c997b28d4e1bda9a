//! # Pipeline de Taggers
//!
//! Executa os taggers em ordem sobre um documento: cada um termina completamente
//! (inclusive o commit e a retokenização) antes que o próximo leia as entidades.
//! Por isso a ordem importa: em conflitos, o tagger mais tardio vence.
//!
//! Documentos diferentes são independentes. [`TaggingPipeline::process_batch`]
//! processa um lote em paralelo com `rayon`, compartilhando os autômatos (somente
//! leitura) entre as threads.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::TaggerConfig;
use crate::document::Document;
use crate::error::Result;
use crate::tagger::{DictionaryTagger, TagReport, Tagger};

/// Sequência ordenada de taggers.
#[derive(Default)]
pub struct TaggingPipeline {
    taggers: Vec<Box<dyn Tagger>>,
}

impl TaggingPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta um tagger ao fim do pipeline.
    pub fn add<T: Tagger + 'static>(&mut self, tagger: T) -> &mut Self {
        info!(tagger = tagger.name(), position = self.taggers.len(), "tagger adicionado");
        self.taggers.push(Box::new(tagger));
        self
    }

    /// Versão encadeável de [`TaggingPipeline::add`].
    pub fn with<T: Tagger + 'static>(mut self, tagger: T) -> Self {
        self.add(tagger);
        self
    }

    /// Monta o pipeline a partir de pares (dicionário, configuração), na ordem dada.
    pub fn from_configs<P: AsRef<std::path::Path>>(sources: Vec<(P, TaggerConfig)>) -> Result<Self> {
        let mut pipeline = Self::new();
        for (path, config) in sources {
            pipeline.add(DictionaryTagger::from_path(path, config)?);
        }
        Ok(pipeline)
    }

    pub fn len(&self) -> usize {
        self.taggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taggers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.taggers.iter().map(|t| t.name()).collect()
    }

    /// Aplica todos os taggers, em ordem, a um documento.
    pub fn process(&self, document: &mut Document) -> Vec<TagReport> {
        self.taggers
            .iter()
            .map(|tagger| {
                let report = tagger.tag(document);
                if report.conflict() {
                    warn!(tagger = tagger.name(), "tagger não contribuiu entidades (conflito)");
                }
                report
            })
            .collect()
    }

    /// Processa vários documentos em paralelo. Os relatórios seguem a ordem dos documentos.
    pub fn process_batch(&self, documents: &mut [Document]) -> Vec<Vec<TagReport>> {
        documents
            .par_iter_mut()
            .map(|document| self.process(document))
            .collect()
    }
}
