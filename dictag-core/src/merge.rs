//! # Fusão entre Taggers
//!
//! Cada tagger do pipeline propõe spans sem saber o que os anteriores já
//! confirmaram. Este módulo combina os spans novos com as entidades existentes:
//!
//! - documento **sem** entidades: os candidatos são confirmados diretamente. Se a
//!   estrutura detectar um conflito (dois spans sobre os mesmos tokens), o conflito
//!   é registrado em log e o documento volta ao estado anterior;
//! - documento **com** entidades: para cada candidato, as entidades existentes que
//!   se sobrepõem a ele são removidas e o candidato é inserido. O tagger executado
//!   por último tem prioridade.
//!
//! Depois do commit, os tokens de cada entidade multi-token são fundidos
//! (retokenização, ver [`Document::merge_entity_tokens`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::document::{Document, EntitySpan};
use crate::error::{DictagError, Result};

/// Conjunto de entidades sem sobreposição, ordenado pelo token inicial.
///
/// Funciona como uma árvore de intervalos sobre os índices de token: como os
/// intervalos são disjuntos, indexá-los pelo início basta para consultar
/// sobreposições em `O(log n + k)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EntitySpan>", into = "Vec<EntitySpan>")]
pub struct EntitySet {
    spans: BTreeMap<usize, EntitySpan>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Entidades em ordem de token.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySpan> {
        self.spans.values()
    }

    /// Entidades que se sobrepõem ao intervalo de tokens `[start, end)`.
    pub fn overlapping(&self, start: usize, end: usize) -> impl Iterator<Item = &EntitySpan> {
        // no máximo uma entidade começa antes de `start` e ainda o cobre
        let before = self
            .spans
            .range(..start)
            .next_back()
            .map(|(_, span)| span)
            .filter(move |span| span.overlaps(start, end));
        let inside = self.spans.range(start..end.max(start)).map(|(_, span)| span);
        before.into_iter().chain(inside)
    }

    /// Remove e devolve as entidades que se sobrepõem a `[start, end)`.
    pub fn remove_overlap(&mut self, start: usize, end: usize) -> Vec<EntitySpan> {
        let keys: Vec<usize> = self.overlapping(start, end).map(|s| s.start_token).collect();
        keys.into_iter()
            .filter_map(|key| self.spans.remove(&key))
            .collect()
    }

    /// Insere o span removendo antes qualquer entidade sobreposta (o mais novo vence).
    pub fn insert_replacing(&mut self, span: EntitySpan) -> Vec<EntitySpan> {
        let removed = self.remove_overlap(span.start_token, span.end_token);
        self.spans.insert(span.start_token, span);
        removed
    }

    /// Insere o span apenas se ele não se sobrepõe a nenhuma entidade.
    pub fn try_insert(&mut self, span: EntitySpan) -> Result<()> {
        if let Some(existing) = self.overlapping(span.start_token, span.end_token).next() {
            return Err(DictagError::SpanConflict {
                first: Box::new(existing.clone()),
                second: Box::new(span),
            });
        }
        self.spans.insert(span.start_token, span);
        Ok(())
    }

    /// Reescreve os índices de token após a retokenização.
    ///
    /// `remap[i]` é o novo índice do token antigo `i`; o último elemento é o novo
    /// número de tokens.
    pub(crate) fn remap_tokens(&mut self, remap: &[usize]) {
        let spans = std::mem::take(&mut self.spans);
        for (_, mut span) in spans {
            if let (Some(&start), Some(&last)) = (
                remap.get(span.start_token),
                span.end_token.checked_sub(1).and_then(|i| remap.get(i)),
            ) {
                span.start_token = start;
                span.end_token = last + 1;
            }
            self.spans.insert(span.start_token, span);
        }
    }
}

impl TryFrom<Vec<EntitySpan>> for EntitySet {
    type Error = DictagError;

    fn try_from(spans: Vec<EntitySpan>) -> Result<Self> {
        let mut set = EntitySet::new();
        for span in spans {
            set.try_insert(span)?;
        }
        Ok(set)
    }
}

impl From<EntitySet> for Vec<EntitySpan> {
    fn from(set: EntitySet) -> Self {
        set.spans.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a EntitySet {
    type Item = &'a EntitySpan;
    type IntoIter = std::collections::btree_map::Values<'a, usize, EntitySpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.values()
    }
}

/// Resultado da fusão de um tagger em um documento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Nenhum candidato; documento inalterado.
    Unchanged,
    /// Candidatos confirmados.
    Committed {
        committed: usize,
        /// Entidades de taggers anteriores substituídas.
        replaced: usize,
        /// Entidades multi-token fundidas em um único token.
        merged_tokens: usize,
    },
    /// Conflito não resolvido; documento mantido no estado anterior.
    Conflict,
}

/// Confirma os candidatos no documento e retokeniza.
///
/// Nunca falha para o chamador: um conflito vira [`MergeOutcome::Conflict`] e log
/// de erro.
pub fn merge(document: &mut Document, candidates: Vec<EntitySpan>) -> MergeOutcome {
    if candidates.is_empty() {
        return MergeOutcome::Unchanged;
    }

    let committed = candidates.len();
    let mut replaced = 0;

    if document.entities.is_empty() {
        let mut entities = EntitySet::new();
        for span in candidates {
            if let Err(err) = entities.try_insert(span) {
                if let DictagError::SpanConflict { first, second } = &err {
                    error!(
                        first = %first.text,
                        first_range = ?(first.start_token, first.end_token),
                        second = %second.text,
                        second_range = ?(second.start_token, second.end_token),
                        "conflito ao confirmar entidades: {err}"
                    );
                } else {
                    error!("{err}");
                }
                return MergeOutcome::Conflict;
            }
        }
        document.entities = entities;
    } else {
        for span in candidates {
            let removed = document.entities.insert_replacing(span);
            for old in &removed {
                debug!(
                    text = %old.text,
                    label = %old.label,
                    range = ?(old.start_token, old.end_token),
                    "entidade anterior substituída"
                );
            }
            replaced += removed.len();
        }
    }

    let merged_tokens = document.merge_entity_tokens();
    MergeOutcome::Committed {
        committed,
        replaced,
        merged_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::LabelSet;

    fn span(text: &str, label: &str, start_token: usize, end_token: usize) -> EntitySpan {
        EntitySpan {
            text: text.to_string(),
            label: label.to_string(),
            labels: LabelSet::from([label.to_lowercase()]),
            start_token,
            end_token,
            start: 0,
            end: 0,
        }
    }

    fn ranges(set: &EntitySet) -> Vec<(usize, usize)> {
        set.iter().map(|s| (s.start_token, s.end_token)).collect()
    }

    #[test]
    fn test_overlapping_queries() {
        let mut set = EntitySet::new();
        set.try_insert(span("a", "X", 2, 4)).unwrap();
        set.try_insert(span("b", "X", 6, 7)).unwrap();
        let hits = |s, e| -> Vec<usize> { set.overlapping(s, e).map(|x| x.start_token).collect() };
        assert_eq!(hits(3, 5), vec![2]);
        assert_eq!(hits(0, 2), Vec::<usize>::new());
        assert_eq!(hits(4, 6), Vec::<usize>::new());
        assert_eq!(hits(0, 10), vec![2, 6]);
        assert_eq!(hits(6, 7), vec![6]);
    }

    #[test]
    fn test_try_insert_conflict() {
        let mut set = EntitySet::new();
        set.try_insert(span("water", "CHEMICAL", 1, 2)).unwrap();
        let err = set.try_insert(span("water buffalo", "TAXON", 1, 3)).unwrap_err();
        assert!(matches!(err, DictagError::SpanConflict { .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_newer_wins_on_overlap() {
        let mut doc = Document::from_text("a b c d e f");
        doc.entities.try_insert(span("c d", "CHEMICAL", 2, 4)).unwrap();

        let outcome = merge(&mut doc, vec![span("d e", "TAXON", 3, 5)]);
        assert_eq!(
            outcome,
            MergeOutcome::Committed { committed: 1, replaced: 1, merged_tokens: 1 }
        );
        assert_eq!(doc.entities.len(), 1);
        let entity = doc.entities.iter().next().unwrap();
        assert_eq!(entity.label, "TAXON");
        // após a retokenização "d e" é o token 3
        assert_eq!((entity.start_token, entity.end_token), (3, 4));
        assert_eq!(doc.tokens[3].text, "d e");
    }

    #[test]
    fn test_non_overlapping_existing_kept() {
        let mut doc = Document::from_text("a b c d e f");
        doc.entities.try_insert(span("a", "CHEMICAL", 0, 1)).unwrap();
        merge(&mut doc, vec![span("e", "TAXON", 4, 5)]);
        assert_eq!(ranges(&doc.entities), vec![(0, 1), (4, 5)]);
    }

    #[test]
    fn test_conflict_leaves_document_unchanged() {
        let mut doc = Document::from_text("a b c d");
        let before = doc.clone();
        let outcome = merge(
            &mut doc,
            vec![span("b", "TAXON", 1, 2), span("b c", "TAXON", 1, 3)],
        );
        assert_eq!(outcome, MergeOutcome::Conflict);
        assert!(doc.entities.is_empty());
        assert_eq!(doc.tokens, before.tokens);
    }

    #[test]
    fn test_empty_candidates() {
        let mut doc = Document::from_text("a b");
        assert_eq!(merge(&mut doc, vec![]), MergeOutcome::Unchanged);
    }

    #[test]
    fn test_serde_rejects_overlapping_entities() {
        let json = r#"[
            {"text":"a","label":"X","labels":["x"],"start_token":0,"end_token":2,"start":0,"end":3},
            {"text":"b","label":"X","labels":["x"],"start_token":1,"end_token":3,"start":2,"end":5}
        ]"#;
        assert!(serde_json::from_str::<EntitySet>(json).is_err());
    }
}
