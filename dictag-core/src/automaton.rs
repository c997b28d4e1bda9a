//! # Autômato de Dicionário (Aho-Corasick)
//!
//! Compila um mapeamento `nome -> rótulos` em um autômato de múltiplos padrões que
//! reporta, em uma única passada linear sobre o texto, **todas** as ocorrências de
//! todos os nomes, inclusive aninhadas e sobrepostas.
//!
//! ## Ciclo de vida
//!
//! 1. [`DictionaryBuilder`] acumula entradas (mutável).
//! 2. [`DictionaryBuilder::finalize`] consome o builder e devolve um [`Automaton`].
//! 3. O [`Automaton`] é imutável e pode ser compartilhado entre threads.
//!
//! Alterar o dicionário depois do `finalize` não é possível: o builder deixa de
//! existir e o autômato não expõe nenhuma operação mutável.
//!
//! ## Variante capitalizada
//!
//! Para cada nome é adicionada também a variante com a primeira letra maiúscula
//! ("ethyl acetate" -> "Ethyl acetate"), pois termos no início de frase aparecem
//! capitalizados. As duas variantes compartilham os rótulos.
//!
//! A validação de fronteira de palavra **não** é feita aqui (ver [`crate::boundary`]).

use std::collections::{BTreeMap, BTreeSet};

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Conjunto de rótulos de um nome, com ordem de iteração determinística.
pub type LabelSet = BTreeSet<String>;

/// Uma ocorrência de um nome do dicionário no texto, antes de qualquer filtro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMatch {
    /// O nome do dicionário encontrado.
    pub text: String,
    pub labels: LabelSet,
    /// Offset de byte inicial (inclusivo).
    pub start: usize,
    /// Offset de byte final (exclusivo).
    pub end: usize,
}

/// Acumulador mutável de entradas do dicionário.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    entries: BTreeMap<String, LabelSet>,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona um nome com seus rótulos (e a variante capitalizada).
    ///
    /// Nomes repetidos acumulam a união dos rótulos. Nomes vazios são ignorados.
    pub fn add<I, S>(&mut self, name: &str, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add_excluding(name, labels, &BTreeSet::new());
    }

    /// Como [`DictionaryBuilder::add`], mas nenhuma das duas formas (literal ou
    /// capitalizada) entra se estiver em `excluded`.
    pub fn add_excluding<I, S>(&mut self, name: &str, labels: I, excluded: &BTreeSet<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if name.is_empty() || excluded.contains(name) {
            return;
        }
        let labels: LabelSet = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return;
        }
        let capitalized = capitalize_first(name);
        if capitalized != name && !excluded.contains(&capitalized) {
            self.entries
                .entry(capitalized)
                .or_default()
                .extend(labels.iter().cloned());
        }
        self.entries
            .entry(name.to_string())
            .or_default()
            .extend(labels);
    }

    /// Número de nomes distintos (incluindo variantes capitalizadas).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Compila o autômato. O builder é consumido.
    pub fn finalize(self) -> Result<Automaton> {
        let (names, labels): (Vec<String>, Vec<LabelSet>) = self.entries.into_iter().unzip();
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&names)?;
        Ok(Automaton {
            matcher,
            names,
            labels,
        })
    }
}

/// Autômato compilado e imutável.
#[derive(Debug, Clone)]
pub struct Automaton {
    matcher: AhoCorasick,
    /// Indexado pelo `PatternID` do matcher.
    names: Vec<String>,
    labels: Vec<LabelSet>,
}

impl Automaton {
    /// Todas as ocorrências de nomes do dicionário em `text`, ordenadas pela posição final.
    ///
    /// O iterador é preguiçoso; nenhuma ocorrência é omitida, independentemente dos
    /// caracteres vizinhos.
    pub fn matches_ending_at<'a>(&'a self, text: &'a str) -> impl Iterator<Item = RawMatch> + 'a {
        self.matcher.find_overlapping_iter(text).map(move |m| {
            let id = m.pattern().as_usize();
            RawMatch {
                text: self.names[id].clone(),
                labels: self.labels[id].clone(),
                start: m.start(),
                end: m.end(),
            }
        })
    }

    /// Rótulos de um nome exato, se estiver no dicionário.
    pub fn labels_of(&self, name: &str) -> Option<&LabelSet> {
        self.names
            .binary_search_by(|n| n.as_str().cmp(name))
            .ok()
            .map(|i| &self.labels[i])
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Primeira letra em maiúscula, resto inalterado.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(names: &[&str]) -> Automaton {
        let mut builder = DictionaryBuilder::new();
        for name in names {
            builder.add(name, ["chemical"]);
        }
        builder.finalize().unwrap()
    }

    #[test]
    fn test_nested_and_overlapping_matches() {
        let automaton = build(&["hydrogen", "hydrogen peroxide", "peroxide"]);
        let text = "decompose hydrogen peroxide are";
        let found: Vec<(usize, usize, String)> = automaton
            .matches_ending_at(text)
            .map(|m| (m.start, m.end, m.text))
            .collect();
        assert!(found.contains(&(10, 18, "hydrogen".to_string())));
        assert!(found.contains(&(10, 27, "hydrogen peroxide".to_string())));
        assert!(found.contains(&(19, 27, "peroxide".to_string())));
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_no_boundary_check_at_match_time() {
        let automaton = build(&["lead"]);
        let found: Vec<RawMatch> = automaton.matches_ending_at("leader").collect();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].start, found[0].end), (0, 4));
    }

    #[test]
    fn test_capitalized_variant() {
        let automaton = build(&["ethyl acetate"]);
        assert!(automaton.labels_of("Ethyl acetate").is_some());
        let found: Vec<RawMatch> = automaton.matches_ending_at("Ethyl acetate is").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Ethyl acetate");
    }

    #[test]
    fn test_labels_accumulate() {
        let mut builder = DictionaryBuilder::new();
        builder.add("C. elegans", ["6239"]);
        builder.add("C. elegans", ["4853"]);
        builder.add("C. elegans", ["6239"]);
        let automaton = builder.finalize().unwrap();
        let labels: Vec<&str> = automaton
            .labels_of("C. elegans")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(labels, vec!["4853", "6239"]);
    }

    #[test]
    fn test_capitalized_variant_merges_with_existing_name() {
        let mut builder = DictionaryBuilder::new();
        builder.add("Lead", ["a"]);
        builder.add("lead", ["b"]);
        let automaton = builder.finalize().unwrap();
        assert_eq!(automaton.labels_of("Lead").unwrap().len(), 2);
        assert_eq!(automaton.labels_of("lead").unwrap().len(), 1);
    }

    #[test]
    fn test_excluded_capitalized_variant() {
        let excluded: BTreeSet<String> = ["Data", "This", "other"].iter().map(|s| s.to_string()).collect();
        let mut builder = DictionaryBuilder::new();
        builder.add_excluding("data", ["1"], &excluded);
        builder.add_excluding("this", ["2"], &excluded);
        builder.add_excluding("other", ["3"], &excluded);
        builder.add_excluding("mouse", ["4"], &excluded);

        assert!(builder.contains("data"));
        assert!(!builder.contains("Data"));
        assert!(builder.contains("this"));
        assert!(!builder.contains("This"));
        assert!(!builder.contains("other"));
        assert!(!builder.contains("Other"));
        assert!(builder.contains("Mouse"));

        let automaton = builder.finalize().unwrap();
        assert_eq!(automaton.matches_ending_at("Data were collected. This is fine.").count(), 0);
    }

    #[test]
    fn test_empty_names_ignored() {
        let mut builder = DictionaryBuilder::new();
        builder.add("", ["x"]);
        assert!(builder.is_empty());
        let automaton = builder.finalize().unwrap();
        assert_eq!(automaton.matches_ending_at("anything").count(), 0);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("water"), "Water");
        assert_eq!(capitalize_first("éter"), "Éter");
        assert_eq!(capitalize_first("2-propanol"), "2-propanol");
        assert_eq!(capitalize_first(""), "");
    }
}
