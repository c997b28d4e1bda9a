//! # Alinhamento com Tokens e Filtro de Substantivos
//!
//! Converte anotações (offsets de caractere) em spans de tokens. Só sobrevivem
//! anotações cujo início coincide com o início de um token **e** cujo fim coincide
//! com o fim de um token; as demais cruzam uma fronteira de token e são descartadas.
//!
//! Palavras comuns que também são nomes de substâncias ("lead", "gold", "water")
//! geram falsos positivos quando usadas como verbo ou em outro sentido. Um span de
//! um único token cujo nome esteja na lista de palavras ambíguas só é mantido se o
//! token estiver etiquetado como substantivo (`NOUN`).

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boundary::Annotation;
use crate::document::{EntitySpan, Pos, Token};

/// Resultado do alinhamento de um documento.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alignment {
    /// Spans candidatos, na ordem das anotações.
    pub spans: Vec<EntitySpan>,
    /// Anotações descartadas por não coincidirem com fronteiras de token.
    pub misaligned: usize,
    /// Spans descartados pelo filtro de substantivos.
    pub noun_filtered: usize,
}

/// Alinha anotações aos tokens e aplica o filtro de palavras ambíguas.
///
/// `label` é o tipo de entidade atribuído aos spans (ex: "CHEMICAL").
pub fn align(
    annotations: &[Annotation],
    text: &str,
    tokens: &[Token],
    label: &str,
    ambiguous_words: &BTreeSet<String>,
) -> Alignment {
    let mut by_start: HashMap<usize, usize> = HashMap::with_capacity(tokens.len());
    let mut by_end: HashMap<usize, usize> = HashMap::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        by_start.entry(token.start).or_insert(i);
        by_end.entry(token.end).or_insert(i);
    }

    let mut alignment = Alignment::default();
    for annotation in annotations {
        let (first, last) = match (by_start.get(&annotation.start), by_end.get(&annotation.end)) {
            (Some(&first), Some(&last)) if first <= last => (first, last),
            _ => {
                debug!(
                    text = annotation.surface(text),
                    start = annotation.start,
                    end = annotation.end,
                    "anotação não alinhada com tokens, descartada"
                );
                alignment.misaligned += 1;
                continue;
            }
        };

        let surface = annotation.surface(text);
        if first == last
            && tokens[first].pos != Pos::Noun
            && (ambiguous_words.contains(&annotation.text) || ambiguous_words.contains(surface))
        {
            debug!(
                text = surface,
                pos = %tokens[first].pos,
                "palavra ambígua fora de uso nominal, descartada"
            );
            alignment.noun_filtered += 1;
            continue;
        }

        alignment.spans.push(EntitySpan {
            text: surface.to_string(),
            label: label.to_string(),
            labels: annotation.labels.clone(),
            start_token: first,
            end_token: last + 1,
            start: annotation.start,
            end: annotation.end,
        });
    }
    alignment
}
