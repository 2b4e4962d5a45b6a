use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabularData {
    #[serde(default, deserialize_with = "deserialize_cells")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_rows", alias = "rows")]
    pub data: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceResponse {
    #[serde(default, alias = "text")]
    pub response: Option<String>,
    #[serde(default, alias = "mapHtml", alias = "map")]
    pub map_html: Option<String>,
    #[serde(default, alias = "tableData", alias = "table")]
    pub table_data: Option<TabularData>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatPresentation {
    pub text: String,
    pub tables: Vec<String>,
    #[serde(rename = "tableCount")]
    pub table_count: usize,
    #[serde(rename = "mapHtml", skip_serializing_if = "Option::is_none")]
    pub map_html: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Map,
    Report,
    Chart,
    Extract,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Report => "report",
            Self::Chart => "chart",
            Self::Extract => "extract",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "map" => Ok(Self::Map),
            "report" => Ok(Self::Report),
            "chart" => Ok(Self::Chart),
            "extract" => Ok(Self::Extract),
            other => bail!("unknown artifact kind: {other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub conversation_id: String,
    pub kind: ArtifactKind,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDraft {
    pub conversation_id: String,
    pub kind: ArtifactKind,
    pub title: String,
    pub content: String,
}

fn deserialize_cells<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(cell_to_string).collect())
}

fn deserialize_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<Value>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}
