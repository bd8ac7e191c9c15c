/// MCP server for the Pennsylvania Department of State business search.
///
/// Exposes four tools:
/// - `search_entities`: Name/keyword search
/// - `resolve_entity`: Resolve a details URL to record number, name and agent
/// - `get_entity_detail`: Full normalized profile including filing documents
/// - `get_entity_documents`: Filing history documents for a record number
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::detail::DetailFetcher;
use crate::lookup::Outcome;
use crate::model::{Document, EntityDetail, EntityReference, SearchResult};
use crate::search::SearchClient;

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchEntitiesParams {
    /// Business name or keyword, e.g. "Acme".
    query: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct EntityUrlParams {
    /// Details URL as returned by `search_entities`,
    /// e.g. "https://file.dos.pa.gov/api/FilingDetail/business/1234/false".
    url: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RecordNumParams {
    /// Canonical record number, e.g. "0001234".
    record_num: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SearchEntitiesResponse {
    outcome: Outcome,
    error: Option<String>,
    results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ResolveEntityResponse {
    outcome: Outcome,
    error: Option<String>,
    reference: Option<EntityReference>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct EntityDetailResponse {
    outcome: Outcome,
    error: Option<String>,
    detail: Option<EntityDetail>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct DocumentsResponse {
    documents: Vec<Document>,
}

#[derive(Clone)]
pub struct BusinessSearchServer {
    search: Arc<SearchClient>,
    details: Arc<DetailFetcher>,
    tool_router: ToolRouter<BusinessSearchServer>,
}

impl BusinessSearchServer {
    pub fn new(search: Arc<SearchClient>, details: Arc<DetailFetcher>) -> Self {
        Self {
            search,
            details,
            tool_router: Self::tool_router(),
        }
    }
}

fn required(value: &str, name: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{name} must not be empty"));
    }
    Ok(value.to_string())
}

#[tool_router]
impl BusinessSearchServer {
    #[tool(description = "Search Pennsylvania business entities by name or keyword. Returns matches in provider order, each with a details URL.")]
    async fn search_entities(
        &self,
        Parameters(params): Parameters<SearchEntitiesParams>,
    ) -> Result<Json<SearchEntitiesResponse>, String> {
        let query = required(&params.query, "query")?;
        let lookup = self.search.search(&query).await;
        Ok(Json(SearchEntitiesResponse {
            outcome: lookup.outcome(),
            error: lookup.error_message(),
            results: lookup.into_value(),
        }))
    }

    #[tool(description = "Resolve a business details URL to its canonical record number, row id, name and registered agent.")]
    async fn resolve_entity(
        &self,
        Parameters(params): Parameters<EntityUrlParams>,
    ) -> Result<Json<ResolveEntityResponse>, String> {
        let url = required(&params.url, "url")?;
        let lookup = self.search.resolve_reference(&url).await;
        Ok(Json(ResolveEntityResponse {
            outcome: lookup.outcome(),
            error: lookup.error_message(),
            reference: lookup.found(),
        }))
    }

    #[tool(description = "Fetch the full normalized profile of a business from its details URL: status, filing dates, addresses, governors, registered agent and filing documents.")]
    async fn get_entity_detail(
        &self,
        Parameters(params): Parameters<EntityUrlParams>,
    ) -> Result<Json<EntityDetailResponse>, String> {
        let url = required(&params.url, "url")?;
        let lookup = self.details.fetch_detail(&url).await;
        Ok(Json(EntityDetailResponse {
            outcome: lookup.outcome(),
            error: lookup.error_message(),
            detail: lookup.found(),
        }))
    }

    #[tool(description = "List filing history documents (type, date, download link) for a business record number.")]
    async fn get_entity_documents(
        &self,
        Parameters(params): Parameters<RecordNumParams>,
    ) -> Result<Json<DocumentsResponse>, String> {
        let record_num = required(&params.record_num, "record_num")?;
        let documents = self.details.fetch_documents(&record_num).await;
        Ok(Json(DocumentsResponse { documents }))
    }
}

#[tool_handler]
impl ServerHandler for BusinessSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pa-business-search".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Pennsylvania Department of State business search MCP server. Use \
                 search_entities to find businesses by name, then pass a result's url to \
                 get_entity_detail for the full profile. Every response carries an outcome \
                 (found, no_rows, no_business_code, failed) so an empty answer can be told \
                 apart from a failed request."
                    .to_string(),
            ),
        }
    }
}
