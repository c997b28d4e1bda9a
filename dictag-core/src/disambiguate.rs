//! # Desambiguação de Rótulos
//!
//! Um mesmo nome pode pertencer a vários táxons ("C. elegans" é tanto o nematoide
//! quanto plantas de outros gêneros). Quando o documento também menciona o nome
//! completo e inequívoco ("Caenorhabditis elegans"), essa evidência restringe os
//! candidatos da forma ambígua.
//!
//! ## Heurística (escopo de um documento)
//! 1. `únicos` = união dos rótulos de toda anotação com exatamente um rótulo.
//! 2. Para cada anotação com mais de um rótulo: `candidatos = rótulos ∩ únicos`.
//! 3. Se `candidatos` não é vazio, substitui os rótulos; senão mantém a ambiguidade.

use serde::{Deserialize, Serialize};

use crate::automaton::LabelSet;
use crate::boundary::Annotation;

/// Estratégia de desambiguação de um tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disambiguation {
    /// Rótulos mantidos como vieram do dicionário (tagger de químicos).
    #[default]
    None,
    /// Restringe anotações multi-rótulo pela evidência de rótulos únicos (tagger de táxons).
    UniqueLabels,
}

impl Disambiguation {
    /// Aplica a estratégia; retorna o número de anotações restringidas.
    pub fn apply(&self, annotations: &mut [Annotation]) -> usize {
        match self {
            Disambiguation::None => 0,
            Disambiguation::UniqueLabels => narrow_by_unique_labels(annotations),
        }
    }
}

fn narrow_by_unique_labels(annotations: &mut [Annotation]) -> usize {
    let uniques: LabelSet = annotations
        .iter()
        .filter(|a| a.labels.len() == 1)
        .flat_map(|a| a.labels.iter().cloned())
        .collect();
    if uniques.is_empty() {
        return 0;
    }

    let mut narrowed = 0;
    for annotation in annotations.iter_mut().filter(|a| a.labels.len() > 1) {
        let candidates: LabelSet = annotation.labels.intersection(&uniques).cloned().collect();
        if !candidates.is_empty() && candidates != annotation.labels {
            annotation.labels = candidates;
            narrowed += 1;
        }
    }
    narrowed
}
