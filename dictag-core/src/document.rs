//! # Modelo de Documento
//!
//! O documento é produzido pelo pipeline externo (texto, tokens, POS) e passa por
//! cada tagger em sequência. O motor lê os tokens, propõe spans e, ao final de
//! cada tagger, substitui o conjunto de entidades e funde os tokens de entidades
//! com mais de uma palavra (retokenização).
//!
//! Todos os offsets de caractere são **offsets de byte UTF-8** em `Document::text`,
//! sempre sobre fronteiras de caractere.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::automaton::LabelSet;
use crate::merge::EntitySet;
use crate::tokenizer::tokenize;

/// Classe gramatical grossa (Universal Dependencies), fornecida pelo tagger de POS externo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    /// Desconhecido ou não etiquetado.
    #[default]
    X,
}

impl Pos {
    pub fn name(&self) -> &'static str {
        match self {
            Pos::Adj => "ADJ",
            Pos::Adp => "ADP",
            Pos::Adv => "ADV",
            Pos::Aux => "AUX",
            Pos::Cconj => "CCONJ",
            Pos::Det => "DET",
            Pos::Intj => "INTJ",
            Pos::Noun => "NOUN",
            Pos::Num => "NUM",
            Pos::Part => "PART",
            Pos::Pron => "PRON",
            Pos::Propn => "PROPN",
            Pos::Punct => "PUNCT",
            Pos::Sconj => "SCONJ",
            Pos::Sym => "SYM",
            Pos::Verb => "VERB",
            Pos::X => "X",
        }
    }
}

impl FromStr for Pos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pos = match s.to_ascii_uppercase().as_str() {
            "ADJ" => Pos::Adj,
            "ADP" => Pos::Adp,
            "ADV" => Pos::Adv,
            "AUX" => Pos::Aux,
            "CCONJ" | "CONJ" => Pos::Cconj,
            "DET" => Pos::Det,
            "INTJ" => Pos::Intj,
            "NOUN" => Pos::Noun,
            "NUM" => Pos::Num,
            "PART" => Pos::Part,
            "PRON" => Pos::Pron,
            "PROPN" => Pos::Propn,
            "PUNCT" => Pos::Punct,
            "SCONJ" => Pos::Sconj,
            "SYM" => Pos::Sym,
            "VERB" => Pos::Verb,
            "X" | "" => Pos::X,
            other => return Err(format!("tag POS desconhecida: {other}")),
        };
        Ok(pos)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Um token fornecido pelo pipeline externo.
///
/// Tokens são contíguos, não se sobrepõem e estão ordenados por `index` e por `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// O texto do token (ex: "hydrogen", ".").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    #[serde(default)]
    pub index: usize,
    /// Classe gramatical atribuída pelo tagger de POS.
    #[serde(default)]
    pub pos: Pos,
}

/// Uma entidade confirmada no documento, em offsets de token.
///
/// # Exemplo
/// Em "decompose hydrogen peroxide are", a entidade "hydrogen peroxide":
/// `EntitySpan { start_token: 1, end_token: 3, label: "CHEMICAL", .. }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Texto coberto pela entidade.
    pub text: String,
    /// Tipo da entidade, definido pelo tagger (ex: "CHEMICAL", "TAXON").
    pub label: String,
    /// Rótulos do dicionário. Para táxons: os identificadores candidatos.
    pub labels: LabelSet,
    /// Índice do token inicial (inclusivo).
    pub start_token: usize,
    /// Índice do token final (exclusivo).
    pub end_token: usize,
    /// Posição de byte inicial no texto original.
    pub start: usize,
    /// Posição de byte final no texto original.
    pub end: usize,
}

impl EntitySpan {
    /// Número de tokens cobertos.
    pub fn len(&self) -> usize {
        self.end_token - self.start_token
    }

    pub fn is_empty(&self) -> bool {
        self.start_token >= self.end_token
    }

    /// Verifica sobreposição com o intervalo de tokens `[start, end)`.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start_token < end && start < self.end_token
    }
}

/// Documento em processamento: texto, tokens e entidades já confirmadas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub tokens: Vec<Token>,
    #[serde(default)]
    pub entities: EntitySet,
}

impl Document {
    /// Cria um documento a partir de tokens fornecidos externamente.
    ///
    /// Os índices dos tokens são reatribuídos na ordem recebida.
    pub fn new(text: impl Into<String>, mut tokens: Vec<Token>) -> Self {
        for (i, token) in tokens.iter_mut().enumerate() {
            token.index = i;
        }
        Self {
            text: text.into(),
            tokens,
            entities: EntitySet::new(),
        }
    }

    /// Cria um documento usando o tokenizador de fallback (todos os tokens com POS `X`).
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let tokens = tokenize(&text);
        Self::new(text, tokens)
    }

    /// Atribui a classe gramatical de um token. Retorna `false` se o índice não existe.
    pub fn set_pos(&mut self, index: usize, pos: Pos) -> bool {
        match self.tokens.get_mut(index) {
            Some(token) => {
                token.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Versão encadeável de [`Document::set_pos`] para vários tokens.
    pub fn with_pos(mut self, tags: &[(usize, Pos)]) -> Self {
        for &(index, pos) in tags {
            self.set_pos(index, pos);
        }
        self
    }

    /// Textos das entidades em ordem de token.
    pub fn entity_texts(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.text.as_str()).collect()
    }

    /// Retokenização: funde os tokens de cada entidade com mais de um token em um
    /// único token atômico e reindexa tokens e entidades.
    ///
    /// O token fundido recebe o texto original do trecho, a união dos offsets e a
    /// classe gramatical do último token (núcleo de sintagmas nominais em inglês).
    ///
    /// Retorna o número de entidades fundidas.
    pub fn merge_entity_tokens(&mut self) -> usize {
        let ranges: Vec<(usize, usize)> = self
            .entities
            .iter()
            .filter(|e| e.len() > 1 && e.end_token <= self.tokens.len())
            .map(|e| (e.start_token, e.end_token))
            .collect();
        if ranges.is_empty() {
            return 0;
        }

        let old = std::mem::take(&mut self.tokens);
        // old index -> new index, com sentinela para fins exclusivos
        let mut remap = Vec::with_capacity(old.len() + 1);
        let mut tokens = Vec::with_capacity(old.len());
        let mut pending = ranges.iter().peekable();
        let mut i = 0;

        while i < old.len() {
            let new_index = tokens.len();
            match pending.peek() {
                Some(&&(start, end)) if start == i => {
                    let first = &old[start];
                    let last = &old[end - 1];
                    tokens.push(Token {
                        text: self.text[first.start..last.end].to_string(),
                        start: first.start,
                        end: last.end,
                        index: new_index,
                        pos: last.pos,
                    });
                    remap.extend(std::iter::repeat(new_index).take(end - start));
                    pending.next();
                    i = end;
                }
                _ => {
                    let mut token = old[i].clone();
                    token.index = new_index;
                    tokens.push(token);
                    remap.push(new_index);
                    i += 1;
                }
            }
        }
        remap.push(tokens.len());

        self.tokens = tokens;
        self.entities.remap_tokens(&remap);
        ranges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn span(doc: &Document, start_token: usize, end_token: usize) -> EntitySpan {
        let start = doc.tokens[start_token].start;
        let end = doc.tokens[end_token - 1].end;
        EntitySpan {
            text: doc.text[start..end].to_string(),
            label: "CHEMICAL".to_string(),
            labels: BTreeSet::from(["chemical".to_string()]),
            start_token,
            end_token,
            start,
            end,
        }
    }

    #[test]
    fn test_pos_parse() {
        assert_eq!("noun".parse::<Pos>().unwrap(), Pos::Noun);
        assert_eq!("PROPN".parse::<Pos>().unwrap(), Pos::Propn);
        assert!("FOO".parse::<Pos>().is_err());
        assert_eq!(Pos::Verb.to_string(), "VERB");
    }

    #[test]
    fn test_merge_entity_tokens_reindexes() {
        let mut doc = Document::from_text("Ethyl acetate is the ester of ethanol and acetic acid.");
        let a = span(&doc, 0, 2);
        let b = span(&doc, 6, 7);
        let c = span(&doc, 8, 10);
        doc.entities.try_insert(a).unwrap();
        doc.entities.try_insert(b).unwrap();
        doc.entities.try_insert(c).unwrap();

        assert_eq!(doc.merge_entity_tokens(), 2);
        let texts: Vec<&str> = doc.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Ethyl acetate", "is", "the", "ester", "of", "ethanol", "and", "acetic acid", "."]
        );
        let ranges: Vec<(usize, usize)> = doc
            .entities
            .iter()
            .map(|e| (e.start_token, e.end_token))
            .collect();
        assert_eq!(ranges, vec![(0, 1), (5, 6), (7, 8)]);
        assert!(doc.tokens.iter().enumerate().all(|(i, t)| t.index == i));
    }

    #[test]
    fn test_merge_keeps_last_pos() {
        let mut doc = Document::from_text("hydrogen peroxide")
            .with_pos(&[(0, Pos::Noun), (1, Pos::Noun)]);
        let s = span(&doc, 0, 2);
        doc.entities.try_insert(s).unwrap();
        doc.merge_entity_tokens();
        assert_eq!(doc.tokens.len(), 1);
        assert_eq!(doc.tokens[0].pos, Pos::Noun);
        assert_eq!(doc.tokens[0].text, "hydrogen peroxide");
    }

    #[test]
    fn test_merge_without_multi_token_entities_is_noop() {
        let mut doc = Document::from_text("lead mine");
        let s = span(&doc, 0, 1);
        doc.entities.try_insert(s).unwrap();
        assert_eq!(doc.merge_entity_tokens(), 0);
        assert_eq!(doc.tokens.len(), 2);
    }
}
