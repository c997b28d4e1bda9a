//! # Tokenizador de fallback
//!
//! O motor espera receber tokens (com POS) do pipeline de NLP externo. Para testes,
//! para o servidor de demonstração e para chamadores sem tokenizador próprio, este
//! módulo segmenta o texto pelas fronteiras de palavra Unicode (UAX #29).
//!
//! Cada token preserva sua posição original no texto (offset de byte), o que é o
//! que o alinhador de tokens compara com as anotações.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use dictag_core::tokenizer::tokenize;
//!
//! // "C", ".", "elegans", "is", "a", "nematode", "."
//! let tokens = tokenize("C. elegans is a nematode.");
//! assert_eq!(tokens.len(), 7);
//! assert_eq!(tokens[2].text, "elegans");
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::document::{Pos, Token};

/// Tokeniza um texto pelas fronteiras de palavra Unicode, descartando espaços.
///
/// Todos os tokens recebem POS [`Pos::X`]; quem precisa do filtro de substantivos
/// deve atribuir as classes depois (ver [`crate::Document::set_pos`]).
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_word_bound_indices()
        .filter(|(_, segment)| !segment.chars().all(char::is_whitespace))
        .enumerate()
        .map(|(index, (start, segment))| Token {
            text: segment.to_string(),
            start,
            end: start + segment.len(),
            index,
            pos: Pos::X,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("Our steps lead us deeper into the lead mine.");
        assert_eq!(tokens.len(), 10);
        assert_eq!(tokens[2].text, "lead");
        assert_eq!(tokens[9].text, ".");
    }

    #[test]
    fn test_offsets_point_into_text() {
        let text = "Enzymes that decompose hydrogen peroxide.";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_hyphen_splits() {
        let texts: Vec<String> = tokenize("free-living").into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["free", "-", "living"]);
    }

    #[test]
    fn test_multibyte_offsets() {
        let tokens = tokenize("ácido cítrico");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].start, "ácido ".len());
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
