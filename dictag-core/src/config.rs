//! # Configuração dos Taggers
//!
//! Duas configurações prontas reproduzem os taggers do sistema:
//!
//! | Preset     | Formato | Tipo       | Desambiguação | Lista negativa | Palavras ambíguas |
//! |------------|---------|------------|---------------|----------------|-------------------|
//! | `chemical` | Names   | `CHEMICAL` | não           | —              | water, gold, lead… |
//! | `taxon`    | Taxa    | `TAXON`    | sim           | other, root…   | —                 |
//!
//! Ambas podem ser ajustadas por JSON; campos ausentes herdam o valor do preset
//! correspondente ao `format`.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dictionary::DictionaryFormat;
use crate::disambiguate::Disambiguation;
use crate::error::Result;

/// Nomes de táxons que são palavras genéricas e geram falsos positivos.
pub const NEGATIVE_TAXA: &[&str] = &[
    "other",
    "not shown",
    "This",
    "e.g.",
    "e.g",
    "plasmids",
    "all",
    "unclassified",
    "unclassified viruses",
    "unknown",
    "Data",
    "none",
    "root",
    "mixed culture",
    "hybrid",
    "ray",
    "vectors",
    "seal",
    "insertion sequence",
    "permit",
    "artificial",
    "collection",
    "spot",
    "metagenome",
    "Patricia",
    "e. a",
    "e. e",
    "name",
    "synthetic",
];

/// Substâncias cujo nome também é substantivo ou verbo comum.
pub const MIGHT_BE_NOUNS: &[&str] = &[
    "water", "Water", "Gold", "gold", "silver", "Silver", "lead", "Lead", "leads", "Leads",
];

/// Configuração de um tagger de dicionário.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggerConfig {
    /// Nome do tagger (logs e relatórios).
    pub name: String,
    /// Tipo atribuído às entidades (ex: "CHEMICAL").
    pub label: String,
    /// Formato do arquivo de dicionário.
    pub format: DictionaryFormat,
    /// Rótulo dado a cada nome em dicionários `Names`.
    pub entry_label: String,
    pub disambiguation: Disambiguation,
    /// Aceita o plural simples com `s` na validação de fronteira.
    pub allow_plural: bool,
    /// Nomes ignorados na construção do autômato.
    pub negative_names: BTreeSet<String>,
    /// Palavras descartadas como token único quando não são substantivo.
    pub ambiguous_words: BTreeSet<String>,
}

impl TaggerConfig {
    /// Tagger de substâncias químicas: um rótulo por nome, sem desambiguação.
    pub fn chemical() -> Self {
        Self {
            name: "chemical_tagger".to_string(),
            label: "CHEMICAL".to_string(),
            format: DictionaryFormat::Names,
            entry_label: "chemical".to_string(),
            disambiguation: Disambiguation::None,
            allow_plural: true,
            negative_names: BTreeSet::new(),
            ambiguous_words: to_set(MIGHT_BE_NOUNS),
        }
    }

    /// Tagger de táxons: vários identificadores por nome, com desambiguação.
    pub fn taxon() -> Self {
        Self {
            name: "taxon_tagger".to_string(),
            label: "TAXON".to_string(),
            format: DictionaryFormat::Taxa,
            entry_label: String::new(),
            disambiguation: Disambiguation::UniqueLabels,
            allow_plural: true,
            negative_names: to_set(NEGATIVE_TAXA),
            ambiguous_words: BTreeSet::new(),
        }
    }

    /// Preset padrão de um formato.
    pub fn for_format(format: DictionaryFormat) -> Self {
        match format {
            DictionaryFormat::Names => Self::chemical(),
            DictionaryFormat::Taxa => Self::taxon(),
        }
    }

    /// Lê uma configuração JSON. Campos ausentes vêm do preset do `format`
    /// (padrão: `names`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let partial: PartialConfig = serde_json::from_str(json)?;
        Ok(partial.resolve())
    }

    /// Como [`TaggerConfig::from_json_str`], para um valor JSON já lido.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let partial: PartialConfig = serde_json::from_value(value)?;
        Ok(partial.resolve())
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Lê uma lista de configurações JSON (`[{...}, {...}]`).
    pub fn list_from_json_str(json: &str) -> Result<Vec<Self>> {
        let partials: Vec<PartialConfig> = serde_json::from_str(json)?;
        Ok(partials.into_iter().map(PartialConfig::resolve).collect())
    }
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self::chemical()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PartialConfig {
    name: Option<String>,
    label: Option<String>,
    format: Option<DictionaryFormat>,
    entry_label: Option<String>,
    disambiguation: Option<Disambiguation>,
    allow_plural: Option<bool>,
    negative_names: Option<BTreeSet<String>>,
    ambiguous_words: Option<BTreeSet<String>>,
}

impl PartialConfig {
    fn resolve(self) -> TaggerConfig {
        let base = TaggerConfig::for_format(self.format.unwrap_or(DictionaryFormat::Names));
        TaggerConfig {
            name: self.name.unwrap_or(base.name),
            label: self.label.unwrap_or(base.label),
            format: base.format,
            entry_label: self.entry_label.unwrap_or(base.entry_label),
            disambiguation: self.disambiguation.unwrap_or(base.disambiguation),
            allow_plural: self.allow_plural.unwrap_or(base.allow_plural),
            negative_names: self.negative_names.unwrap_or(base.negative_names),
            ambiguous_words: self.ambiguous_words.unwrap_or(base.ambiguous_words),
        }
    }
}

fn to_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}
