//! # Validação de Fronteira de Palavra
//!
//! O autômato reporta qualquer substring. Antes de conhecer os tokens, este filtro
//! aceita apenas ocorrências alinhadas com fronteiras de palavra:
//!
//! - caractere **anterior** alfanumérico → rejeita, sempre;
//! - caractere **seguinte** alfanumérico → rejeita, exceto o plural simples: se o
//!   caractere seguinte é exatamente `s` e o próximo não é alfanumérico (ou o texto
//!   termina), a ocorrência é aceita e estendida em um caractere.
//!
//! | Dicionário | Texto       | Resultado           |
//! |------------|-------------|---------------------|
//! | `lead`     | `lead mine` | `lead`              |
//! | `lead`     | `leads to`  | `leads` (plural)    |
//! | `lead`     | `leader`    | rejeitado           |
//! | `lead`     | `mislead`   | rejeitado           |

use serde::{Deserialize, Serialize};

use crate::automaton::{LabelSet, RawMatch};

/// Ocorrência que passou pela validação de fronteira. Offsets em bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Nome do dicionário que originou a anotação (sem o `s` do plural).
    pub text: String,
    pub labels: LabelSet,
    pub start: usize,
    pub end: usize,
}

impl Annotation {
    /// Trecho do texto coberto pela anotação (inclui o `s` do plural).
    pub fn surface<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Valida uma ocorrência contra as fronteiras de palavra de `text`.
pub fn validate(text: &str, raw: RawMatch, allow_plural: bool) -> Option<Annotation> {
    if text[..raw.start]
        .chars()
        .next_back()
        .is_some_and(char::is_alphanumeric)
    {
        return None;
    }

    let mut end = raw.end;
    let mut following = text[raw.end..].chars();
    match following.next() {
        None => {}
        Some('s') if allow_plural => {
            if following.next().is_some_and(char::is_alphanumeric) {
                return None;
            }
            end += 1;
        }
        Some(c) if c.is_alphanumeric() => return None,
        Some(_) => {}
    }

    Some(Annotation {
        text: raw.text,
        labels: raw.labels,
        start: raw.start,
        end,
    })
}

/// Aplica [`validate`] a uma sequência de ocorrências.
pub fn validate_all<I>(text: &str, raws: I, allow_plural: bool) -> Vec<Annotation>
where
    I: IntoIterator<Item = RawMatch>,
{
    raws.into_iter()
        .filter_map(|raw| validate(text, raw, allow_plural))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str, name: &str) -> RawMatch {
        let start = text.find(name).unwrap();
        RawMatch {
            text: name.to_string(),
            labels: LabelSet::from(["chemical".to_string()]),
            start,
            end: start + name.len(),
        }
    }

    fn span(text: &str, name: &str) -> Option<(usize, usize)> {
        validate(text, raw(text, name), true).map(|a| (a.start, a.end))
    }

    #[test]
    fn test_standalone_accepted() {
        assert_eq!(span("the lead mine", "lead"), Some((4, 8)));
        assert_eq!(span("lead", "lead"), Some((0, 4)));
        assert_eq!(span("(lead)", "lead"), Some((1, 5)));
    }

    #[test]
    fn test_preceding_alphanumeric_rejected() {
        assert_eq!(span("mislead them", "lead"), None);
        assert_eq!(span("2lead", "lead"), None);
        // sem exceção de plural para o lado esquerdo
        assert_eq!(span("slead", "lead"), None);
    }

    #[test]
    fn test_following_alphanumeric_rejected() {
        assert_eq!(span("leader", "lead"), None);
        assert_eq!(span("lead2", "lead"), None);
        assert_eq!(span("leadsman", "lead"), None);
    }

    #[test]
    fn test_plural_extends() {
        assert_eq!(span("leads to", "lead"), Some((0, 5)));
        assert_eq!(span("many leads", "lead"), Some((5, 10)));
        assert_eq!(span("leads.", "lead"), Some((0, 5)));
    }

    #[test]
    fn test_plural_disabled() {
        let text = "leads to";
        assert!(validate(text, raw(text, "lead"), false).is_none());
    }

    #[test]
    fn test_multibyte_neighbours() {
        // 'é' é alfanumérico
        assert_eq!(span("élead", "lead"), None);
        assert_eq!(span("— lead —", "lead"), Some(("— ".len(), "— lead".len())));
    }

    #[test]
    fn test_surface_includes_plural() {
        let text = "two leads";
        let annotation = validate(text, raw(text, "lead"), true).unwrap();
        assert_eq!(annotation.text, "lead");
        assert_eq!(annotation.surface(text), "leads");
    }
}
