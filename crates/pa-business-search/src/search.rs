/// Search client for the Department of State business search endpoint.
///
/// Serves both the free-text name search and the business-code lookup that
/// resolves a details URL back to its canonical record number and agent.
use std::sync::Arc;

use filing_common::http::JsonClient;
use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::lookup::{Lookup, Miss};
use crate::model::{EntityReference, SearchResult};
use crate::normalize;
use crate::wire::{self, SearchPayload, SearchRow};

pub struct SearchClient {
    http: Arc<JsonClient>,
    config: Config,
}

impl SearchClient {
    pub fn new(http: Arc<JsonClient>, config: Config) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Search entities by name. Results keep the provider's row order.
    ///
    /// Failures are logged with the query and come back as an empty lookup.
    pub async fn search(&self, query: &str) -> Lookup<Vec<SearchResult>> {
        match self.search_rows(&SearchPayload::by_name(query)).await {
            Ok(rows) if rows.is_empty() => {
                info!(query, "search returned no rows");
                Lookup::Empty(Miss::NoRows)
            }
            Ok(rows) => Lookup::Found(normalize::search_results(&rows, &self.config)),
            Err(e) => {
                error!(query, error = %e, "error fetching search results");
                Lookup::Empty(Miss::Failed(e))
            }
        }
    }

    /// Resolve a details URL to the entity it names.
    ///
    /// The business code is read from the `/business/<code>/` segment; a URL without
    /// one is a logged miss and issues no request. Only the first returned row is used.
    pub async fn resolve_reference(&self, url: &str) -> Lookup<EntityReference> {
        let Some(code) = normalize::business_code(url) else {
            error!(url, "no business code in details url");
            return Lookup::Empty(Miss::NoBusinessCode(url.to_string()));
        };

        match self.search_rows(&SearchPayload::by_business_code(code)).await {
            Ok(rows) => match normalize::first_reference(&rows) {
                Some(reference) => Lookup::Found(reference),
                None => {
                    error!(url, business_code = code, "no search rows for business code");
                    Lookup::Empty(Miss::NoRows)
                }
            },
            Err(e) => {
                error!(url, business_code = code, error = %e, "error resolving entity reference");
                Lookup::Empty(Miss::Failed(e))
            }
        }
    }

    async fn search_rows(&self, payload: &SearchPayload) -> Result<Vec<(String, SearchRow)>, AppError> {
        let envelope: Value = self.http.post_json(&self.config.search_url(), payload).await?;
        wire::search_rows(envelope)
    }
}
