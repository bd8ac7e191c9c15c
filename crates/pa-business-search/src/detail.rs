/// Detail fetcher: resolves a details URL, pulls the entity profile and its filing
/// history, and merges them into one `EntityDetail`.
///
/// The history call degrades on its own: if it fails the profile is still returned,
/// just without documents.
use std::sync::Arc;

use filing_common::http::JsonClient;
use tracing::{error, info};

use crate::lookup::{Lookup, Miss};
use crate::model::{Document, EntityDetail};
use crate::normalize;
use crate::search::SearchClient;
use crate::wire::{DetailEnvelope, HistoryEnvelope};

pub struct DetailFetcher {
    http: Arc<JsonClient>,
    search: Arc<SearchClient>,
}

impl DetailFetcher {
    pub fn new(http: Arc<JsonClient>, search: Arc<SearchClient>) -> Self {
        Self { http, search }
    }

    /// Fetch the full entity detail for a details URL.
    ///
    /// Abandoned (empty) when the URL cannot be resolved to an entity reference.
    pub async fn fetch_detail(&self, url: &str) -> Lookup<EntityDetail> {
        let reference = match self.search.resolve_reference(url).await {
            Lookup::Found(reference) => reference,
            Lookup::Empty(miss) => return Lookup::Empty(miss),
        };

        let detail_url = normalize::rewrite_business_segment(url, &reference.id);
        let envelope: DetailEnvelope = match self.http.get_json(&detail_url).await {
            Ok(envelope) => envelope,
            Err(e) => {
                error!(url = %detail_url, record_num = %reference.record_num, error = %e, "error fetching entity details");
                return Lookup::Empty(Miss::Failed(e.into()));
            }
        };

        let documents = self.fetch_documents(&reference.record_num).await;
        let config = self.search.config();
        info!(
            record_num = %reference.record_num,
            documents = documents.len(),
            "entity detail fetched"
        );
        Lookup::Found(normalize::entity_detail(
            &config.state,
            &reference,
            envelope.drawer(),
            documents,
        ))
    }

    /// Amendment documents for a record number.
    ///
    /// Entries without a link, type or date are skipped; a failed request is logged and
    /// yields no documents.
    pub async fn fetch_documents(&self, record_num: &str) -> Vec<Document> {
        let config = self.search.config();
        match self
            .http
            .get_json::<HistoryEnvelope>(&config.history_url(record_num))
            .await
        {
            Ok(history) => normalize::documents(&history.amendment_list, &config.base_url),
            Err(e) => {
                error!(record_num, error = %e, "error fetching filing history");
                Vec::new()
            }
        }
    }
}
