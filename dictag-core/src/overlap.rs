//! # Resolução de Sobreposição
//!
//! Reduz as anotações de um tagger a um conjunto sem sobreposição, em que a
//! ocorrência mais larga vence.
//!
//! ## Algoritmo
//! 1. Ordena por início crescente; empate por fim **decrescente** (mais larga primeiro).
//! 2. Varre da esquerda para a direita mantendo uma janela `[início, fim]` (inclusiva)
//!    da última anotação mantida.
//! 3. Uma anotação cujo **início** cai dentro da janela é descartada; caso contrário é
//!    mantida e a janela passa a ser o seu span.
//!
//! Só o início do candidato é testado: a ordenação garante que a mais larga de um
//! mesmo início já foi mantida. Uma anotação que começa exatamente no fim da janela
//! também é descartada.
//!
//! # Exemplo
//! `"hydrogen"` e `"hydrogen peroxide"` em "decompose hydrogen peroxide are"
//! resultam apenas em `"hydrogen peroxide"`.

use crate::boundary::Annotation;

/// Ordenação total: início ↑, fim ↓, texto ↑.
pub fn sort_annotations(annotations: &mut [Annotation]) {
    annotations.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.end.cmp(&a.end))
            .then_with(|| a.text.cmp(&b.text))
    });
}

/// Varredura única sobre anotações já ordenadas por [`sort_annotations`].
pub fn remove_overlap(annotations: Vec<Annotation>) -> Vec<Annotation> {
    let mut filtered = Vec::with_capacity(annotations.len());
    let mut window: Option<(usize, usize)> = None;

    for annotation in annotations {
        if let Some((start, end)) = window {
            if annotation.start >= start && annotation.start <= end {
                continue;
            }
        }
        window = Some((annotation.start, annotation.end));
        filtered.push(annotation);
    }
    filtered
}

/// Ordena e remove sobreposições.
pub fn resolve(mut annotations: Vec<Annotation>) -> Vec<Annotation> {
    sort_annotations(&mut annotations);
    remove_overlap(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::LabelSet;

    fn ann(text: &str, start: usize, end: usize) -> Annotation {
        Annotation {
            text: text.to_string(),
            labels: LabelSet::from(["chemical".to_string()]),
            start,
            end,
        }
    }

    fn spans(annotations: &[Annotation]) -> Vec<(usize, usize)> {
        annotations.iter().map(|a| (a.start, a.end)).collect()
    }

    #[test]
    fn test_sort_order() {
        let mut anns = vec![ann("c", 5, 7), ann("a", 0, 3), ann("b", 0, 8), ann("d", 5, 9)];
        sort_annotations(&mut anns);
        assert_eq!(spans(&anns), vec![(0, 8), (0, 3), (5, 9), (5, 7)]);
    }

    #[test]
    fn test_widest_wins_same_start() {
        let resolved = resolve(vec![ann("hydrogen", 10, 18), ann("hydrogen peroxide", 10, 27)]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].text, "hydrogen peroxide");
    }

    #[test]
    fn test_nested_inside_window_dropped() {
        let resolved = resolve(vec![
            ann("hydrogen peroxide", 10, 27),
            ann("peroxide", 19, 27),
            ann("hydrogen", 10, 18),
        ]);
        assert_eq!(spans(&resolved), vec![(10, 27)]);
    }

    #[test]
    fn test_start_only_rule() {
        // começa dentro da janela e termina além dela: descartada mesmo assim
        let resolved = resolve(vec![ann("a", 0, 10), ann("b", 5, 20)]);
        assert_eq!(spans(&resolved), vec![(0, 10)]);
    }

    #[test]
    fn test_start_at_window_end_dropped() {
        let resolved = resolve(vec![ann("a", 0, 5), ann("b", 5, 9)]);
        assert_eq!(spans(&resolved), vec![(0, 5)]);
    }

    #[test]
    fn test_disjoint_kept_in_order() {
        let resolved = resolve(vec![ann("acetic acid", 42, 53), ann("ethanol", 30, 37), ann("Ethyl acetate", 0, 13)]);
        assert_eq!(spans(&resolved), vec![(0, 13), (30, 37), (42, 53)]);
    }

    #[test]
    fn test_empty() {
        assert!(resolve(Vec::new()).is_empty());
    }
}
