use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One matched entity from a name/keyword search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// Jurisdiction tag, e.g. "PA"
    pub state: String,
    /// Entity display name (first line of the provider's TITLE)
    pub name: String,
    /// Entity status, e.g. "Active"
    pub status: String,
    /// Provider row key
    pub id: String,
    /// Details URL, accepted by `get_entity_detail`
    pub url: String,
}

/// Resolved identity used to fetch full details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityReference {
    /// Canonical record number, leading zeros kept (e.g. "0001234")
    pub record_num: String,
    /// Provider row key
    pub id: String,
    pub name: String,
    /// Registered agent name
    pub agent: String,
}

/// An amendment or filing document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    /// Filing type label, e.g. "Articles of Amendment"
    pub name: String,
    pub date: String,
    /// Absolute download link
    pub link: String,
}

/// Full normalized entity profile.
///
/// Optional fields serialize as `null`; keys are never dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntityDetail {
    pub state: String,
    pub name: String,
    pub governors: Option<String>,
    pub interested_individuals: Option<String>,
    pub status: Option<String>,
    /// Provider row key of the entity
    pub registration_number: String,
    /// Only set when `date_registered` is; may be an empty string.
    pub registered_office: Option<String>,
    pub date_registered: Option<String>,
    pub entity_type: Option<String>,
    pub agent_name: Option<String>,
    pub principal_address: Option<String>,
    pub mailing_address: Option<String>,
    pub document_images: Vec<Document>,
}
