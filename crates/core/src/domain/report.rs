// Report Definition Domain Model (static catalog entries)

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Describes one report type offered by the backend.
///
/// `report_type` is the stable primary key used for submission; it never
/// changes after the catalog loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    #[serde(rename = "type")]
    pub report_type: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub schedule: Option<String>,

    #[serde(default)]
    pub parameters: Vec<ReportParameter>,
}

/// One declared input of a report type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParameter {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, rename = "type")]
    pub param_type: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default_value: Option<Value>,

    #[serde(default)]
    pub options: Vec<ParameterOption>,
}

/// Enumerated choice for a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOption {
    #[serde(deserialize_with = "de_option_value")]
    pub value: String,

    #[serde(default)]
    pub label: Option<String>,
}

/// Option values tolerate string or numeric wire forms
fn de_option_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "option value must be a scalar, got {other}"
        ))),
    }
}
