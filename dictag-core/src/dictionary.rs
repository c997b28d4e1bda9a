//! # Leitura de Dicionários
//!
//! Dois formatos orientados a linha alimentam o [`DictionaryBuilder`]:
//!
//! - **Names** (químicos): um nome por linha; linhas em branco são ignoradas.
//!   Todo nome recebe o mesmo rótulo (`entry_label` da configuração).
//! - **Taxa** (táxons): `identificador<TAB>variante|variante|...`. O rótulo é o
//!   trecho do identificador após o último `:` (ex: `NCBITaxon:6239` → `6239`).
//!   Uma variante que aparece em várias linhas acumula todos os rótulos.
//!
//! Linhas malformadas geram um aviso e são puladas; nunca interrompem a carga.
//! Nomes da lista negativa são descartados nos dois formatos, inclusive quando
//! só a variante capitalizada está na lista (`data` entra, `Data` não).

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::automaton::DictionaryBuilder;
use crate::config::TaggerConfig;
use crate::error::Result;

/// Formato do arquivo de dicionário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryFormat {
    /// Um nome por linha.
    #[default]
    Names,
    /// Identificador e variantes separados por tabulação.
    Taxa,
}

/// Estatísticas de carga de um dicionário.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub lines: usize,
    pub malformed: usize,
    /// Variantes ignoradas pela lista negativa.
    pub negative: usize,
    /// Nomes adicionados (sem contar variantes capitalizadas).
    pub names: usize,
}

/// Lê um dicionário no formato indicado pela configuração.
pub fn load<R: BufRead>(reader: R, config: &TaggerConfig) -> Result<(DictionaryBuilder, LoadStats)> {
    let mut builder = DictionaryBuilder::new();
    let stats = load_into(&mut builder, reader, config)?;
    info!(
        tagger = %config.name,
        lines = stats.lines,
        names = stats.names,
        malformed = stats.malformed,
        negative = stats.negative,
        "dicionário carregado"
    );
    Ok((builder, stats))
}

/// Acrescenta as entradas de `reader` a um builder existente.
pub fn load_into<R: BufRead>(
    builder: &mut DictionaryBuilder,
    reader: R,
    config: &TaggerConfig,
) -> Result<LoadStats> {
    let mut stats = LoadStats::default();
    for line in reader.lines() {
        let line = line?;
        stats.lines += 1;
        match config.format {
            DictionaryFormat::Names => add_name_line(builder, &line, config, &mut stats),
            DictionaryFormat::Taxa => add_taxon_line(builder, &line, config, &mut stats),
        }
    }
    Ok(stats)
}

fn add_name_line(builder: &mut DictionaryBuilder, line: &str, config: &TaggerConfig, stats: &mut LoadStats) {
    let name = line.trim_end();
    if name.is_empty() {
        return;
    }
    if config.negative_names.contains(name) {
        stats.negative += 1;
        return;
    }
    builder.add_excluding(name, [config.entry_label.as_str()], &config.negative_names);
    stats.names += 1;
}

fn add_taxon_line(builder: &mut DictionaryBuilder, line: &str, config: &TaggerConfig, stats: &mut LoadStats) {
    let line = line.trim_end();
    if line.is_empty() {
        return;
    }
    let fields: Vec<&str> = line.split('\t').collect();
    let (identifier, variants) = match fields.as_slice() {
        [identifier, variants] => (*identifier, *variants),
        _ => {
            warn!(line = stats.lines, content = line, "linha com formato inválido");
            stats.malformed += 1;
            return;
        }
    };
    let label = match identifier.rsplit_once(':') {
        Some((_, label)) if !label.is_empty() => label,
        _ => {
            warn!(line = stats.lines, identifier, "identificador sem rótulo após ':'");
            stats.malformed += 1;
            return;
        }
    };

    for variant in variants.split('|') {
        if variant.is_empty() {
            continue;
        }
        if config.negative_names.contains(variant) {
            stats.negative += 1;
            continue;
        }
        builder.add_excluding(variant, [label], &config.negative_names);
        stats.names += 1;
    }
}
