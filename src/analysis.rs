//! Integration coverage analysis.
//!
//! An integration is a named group of columns an enrichment step is expected
//! to fill. For every integration whose columns overlap the dataset, the
//! analyzer counts rows carrying a real value in at least one of those
//! columns. Textual zero and false markers count as no signal.

use std::{collections::BTreeMap, fmt, path::Path, sync::OnceLock};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{dataset::Dataset, table::format_tenths};

/// Columns present before any enrichment runs.
pub const ORIGINAL_COLUMNS: &[&str] = &["name", "email", "linkedin_url", "company", "source"];

const BUILTIN_SIGNATURES: &[(&str, &[&str])] = &[
    (
        "linkedin_profile",
        &["headline", "current_company", "location", "follower_count"],
    ),
    (
        "linkedin_post_activity",
        &["posts_last_30_days", "posts_last_90_days", "total_posts"],
    ),
    (
        "linkedin_claude_mentions",
        &["claude_mentions_count", "claude_mention_urls"],
    ),
    (
        "heyreach_engagement",
        &["heyreach_conversations_count", "heyreach_messages_sent"],
    ),
    (
        "heyreach_campaigns",
        &["heyreach_campaign_count", "heyreach_campaign_names"],
    ),
    (
        "heyreach_network",
        &["heyreach_is_connection", "heyreach_connection_degree"],
    ),
];

static BUILTIN_TABLE: OnceLock<SignatureTable> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    LinkedIn,
    HeyReach,
    Other,
}

impl Category {
    pub fn for_integration(name: &str) -> Self {
        if name.starts_with("linkedin_") {
            Category::LinkedIn
        } else if name.starts_with("heyreach_") {
            Category::HeyReach
        } else {
            Category::Other
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::LinkedIn => "LinkedIn",
            Category::HeyReach => "HeyReach",
            Category::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSignature {
    pub name: String,
    pub columns: Vec<String>,
}

impl IntegrationSignature {
    pub fn category(&self) -> Category {
        Category::for_integration(&self.name)
    }
}

/// Ordered list of known integrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureTable {
    signatures: Vec<IntegrationSignature>,
}

impl SignatureTable {
    pub fn new(signatures: Vec<IntegrationSignature>) -> Self {
        Self { signatures }
    }

    /// The compiled-in table, built once per process.
    pub fn builtin() -> &'static SignatureTable {
        BUILTIN_TABLE.get_or_init(|| {
            SignatureTable::new(
                BUILTIN_SIGNATURES
                    .iter()
                    .map(|(name, columns)| IntegrationSignature {
                        name: (*name).to_string(),
                        columns: columns.iter().map(|c| (*c).to_string()).collect(),
                    })
                    .collect(),
            )
        })
    }

    /// Loads a table from a YAML list of `{ name, columns }` entries.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Opening signature file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing signature file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let table: SignatureTable = serde_yaml::from_str(raw)?;
        for signature in &table.signatures {
            ensure!(
                !signature.name.trim().is_empty(),
                "Integration names must not be empty"
            );
            ensure!(
                !signature.columns.is_empty(),
                "Integration '{}' lists no columns",
                signature.name
            );
        }
        Ok(table)
    }

    pub fn signatures(&self) -> &[IntegrationSignature] {
        &self.signatures
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationReport {
    pub columns: Vec<String>,
    pub populated: usize,
    pub empty: usize,
    pub total: usize,
    /// Percentage with one decimal, e.g. `"60.0"`.
    pub success_rate: String,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub total_rows: usize,
    pub total_columns: usize,
    pub original_columns: usize,
    pub enriched_columns: usize,
    pub integrations: BTreeMap<String, IntegrationReport>,
}

pub fn analyze_builtin(dataset: &Dataset) -> WorkflowSummary {
    analyze(dataset, SignatureTable::builtin())
}

pub fn analyze(dataset: &Dataset, table: &SignatureTable) -> WorkflowSummary {
    let columns = dataset.columns();
    let enriched_columns = columns
        .names()
        .iter()
        .filter(|name| !ORIGINAL_COLUMNS.contains(&name.as_str()))
        .count();

    let mut integrations = BTreeMap::new();
    if !dataset.is_empty() {
        for signature in table.signatures() {
            let matched: Vec<String> = signature
                .columns
                .iter()
                .filter(|col| columns.contains(col))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }
            let report = coverage(dataset, matched, signature.category());
            integrations.insert(signature.name.clone(), report);
        }
    }

    WorkflowSummary {
        total_rows: dataset.len(),
        total_columns: columns.len(),
        original_columns: ORIGINAL_COLUMNS.len(),
        enriched_columns,
        integrations,
    }
}

/// Trimmed values that mark a column as unfilled.
const NO_SIGNAL: &[&str] = &["", "0", "0.0", "False"];

/// True when a cell carries a usable value.
pub fn has_signal(value: &str) -> bool {
    !NO_SIGNAL.contains(&value.trim())
}

fn coverage(dataset: &Dataset, matched: Vec<String>, category: Category) -> IntegrationReport {
    let total = dataset.len();
    let populated = dataset
        .rows()
        .iter()
        .filter(|row| {
            matched
                .iter()
                .any(|col| row.get(col).map(|v| has_signal(v)).unwrap_or(false))
        })
        .count();
    IntegrationReport {
        columns: matched,
        populated,
        empty: total - populated,
        total,
        success_rate: success_rate(populated, total),
        category,
    }
}

fn success_rate(populated: usize, total: usize) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format_tenths(populated as f64 / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_signal_rejects_sentinels_and_blanks() {
        for value in ["", " ", "0", "False", "0.0", " 0 "] {
            assert!(!has_signal(value), "{value:?} should carry no signal");
        }
        for value in [
            "Engineer", "false", "1", "0.5", "None", "00", "-0", "+0", "0e9", "0.000",
        ] {
            assert!(has_signal(value), "{value:?} should carry signal");
        }
    }

    #[test]
    fn category_follows_name_prefix() {
        assert_eq!(Category::for_integration("linkedin_profile"), Category::LinkedIn);
        assert_eq!(Category::for_integration("heyreach_network"), Category::HeyReach);
        assert_eq!(Category::for_integration("web_research"), Category::Other);
    }

    #[test]
    fn success_rate_rounds_to_one_decimal() {
        assert_eq!(success_rate(1, 3), "33.3");
        assert_eq!(success_rate(2, 3), "66.7");
        assert_eq!(success_rate(1, 16), "6.3");
        assert_eq!(success_rate(0, 0), "0.0");
    }

    #[test]
    fn builtin_table_lists_six_integrations() {
        let names: Vec<&str> = SignatureTable::builtin()
            .signatures()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "linkedin_profile");
    }

    #[test]
    fn from_yaml_rejects_signature_without_columns() {
        let err = SignatureTable::from_yaml("- name: web_research\n  columns: []\n").unwrap_err();
        assert!(err.to_string().contains("web_research"));
    }
}
