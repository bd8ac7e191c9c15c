/// Request and response shapes of the Department of State filing API.
///
/// Search answers with `{"rows": {"<row key>": {...labeled fields...}}}`. Some labeled
/// fields are single-element lists (`TITLE`), others plain strings, so row fields are
/// read through [`FieldValue`]. Row order matters and relies on `serde_json`'s
/// `preserve_order` feature.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct FilingDate {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SearchPayload {
    pub search_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_filter_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_with_yn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cra_search_yn: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_only_yn: Option<bool>,
    pub filing_date: FilingDate,
}

impl SearchPayload {
    /// Free-text name search over all filing types and statuses.
    pub fn by_name(query: &str) -> Self {
        Self {
            search_value: query.to_string(),
            search_filter_type_id: Some("1".to_string()),
            filing_type_id: Some(String::new()),
            status_id: Some(String::new()),
            starts_with_yn: None,
            cra_search_yn: None,
            active_only_yn: None,
            filing_date: FilingDate::default(),
        }
    }

    /// Search scoped to a business code taken from a details URL.
    pub fn by_business_code(code: &str) -> Self {
        Self {
            search_value: code.to_string(),
            search_filter_type_id: None,
            filing_type_id: None,
            status_id: None,
            starts_with_yn: Some(true),
            cra_search_yn: Some(false),
            active_only_yn: Some(false),
            filing_date: FilingDate::default(),
        }
    }
}

/// A labeled field: a string, a list of lines, or something else entirely.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Lines(Vec<String>),
    Other(Value),
}

impl FieldValue {
    /// The field as text; lists yield their first line.
    pub fn text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Lines(lines) => lines.first().cloned(),
            FieldValue::Other(Value::Number(n)) => Some(n.to_string()),
            FieldValue::Other(Value::Bool(b)) => Some(b.to_string()),
            FieldValue::Other(_) => None,
        }
    }

    /// The field as text with every line kept, one per line.
    ///
    /// Drawer values such as "Governors" list several people.
    pub fn joined(&self) -> Option<String> {
        match self {
            FieldValue::Lines(lines) => Some(
                lines
                    .iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            other => other.text(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRow {
    #[serde(rename = "TITLE", default)]
    pub title: Option<FieldValue>,
    #[serde(rename = "STATUS", default)]
    pub status: Option<FieldValue>,
    #[serde(rename = "RECORD_NUM", default)]
    pub record_num: Option<FieldValue>,
    #[serde(rename = "AGENT", default)]
    pub agent: Option<FieldValue>,
}

impl SearchRow {
    pub fn title(&self) -> String {
        field_text(&self.title)
    }

    pub fn status(&self) -> String {
        field_text(&self.status)
    }

    pub fn record_num(&self) -> String {
        field_text(&self.record_num)
    }

    pub fn agent(&self) -> String {
        field_text(&self.agent)
    }
}

fn field_text(field: &Option<FieldValue>) -> String {
    field.as_ref().and_then(FieldValue::text).unwrap_or_default()
}

/// Pull the `rows` mapping out of a search response, keeping provider order.
///
/// A `null` mapping counts as zero rows; a missing one is a shape error.
pub fn search_rows(envelope: Value) -> Result<Vec<(String, SearchRow)>, AppError> {
    let Value::Object(mut top) = envelope else {
        return Err(AppError::Shape("search response is not an object".to_string()));
    };
    let rows: Map<String, Value> = match top.remove("rows") {
        None => {
            return Err(AppError::Shape(
                "search response has no rows mapping".to_string(),
            ))
        }
        Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(rows)) => rows,
        Some(other) => {
            return Err(AppError::Shape(format!(
                "search rows is not a mapping: {other}"
            )))
        }
    };

    let mut out = Vec::with_capacity(rows.len());
    for (key, value) in rows {
        let row: SearchRow = serde_json::from_value(value)
            .map_err(|e| AppError::Shape(format!("search row '{key}': {e}")))?;
        out.push((key, row));
    }
    Ok(out)
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrawerItem {
    #[serde(rename = "LABEL")]
    pub label: String,
    #[serde(rename = "VALUE", default)]
    pub value: Option<FieldValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailEnvelope {
    #[serde(rename = "DRAWER_DETAIL_LIST", default)]
    pub drawer_detail_list: Option<Vec<DrawerItem>>,
}

impl DetailEnvelope {
    pub fn drawer(&self) -> &[DrawerItem] {
        self.drawer_detail_list.as_deref().unwrap_or_default()
    }
}

/// History response; entries stay raw so one bad entry can be skipped on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEnvelope {
    #[serde(rename = "AMENDMENT_LIST")]
    pub amendment_list: Vec<Value>,
}
