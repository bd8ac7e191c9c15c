/// Pure mapping from provider JSON into the output records.
///
/// Nothing here touches the network; the clients in `search` and `detail` feed
/// decoded envelopes in and hand the records back out.
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::model::{Document, EntityDetail, EntityReference, SearchResult};
use crate::wire::{DrawerItem, FieldValue, SearchRow};

static BUSINESS_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/business/([A-Z0-9]+)/").expect("valid regex"));
// Anchored on the leading `/` so a segment like `/smallbusiness/12/` is never rewritten.
static BUSINESS_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/business/)\d+(/)").expect("valid regex"));

const MAILING_ADDRESS: &str = "Mailing Address";
const PRINCIPAL_ADDRESS: &str = "Principal Address";
const REGISTERED_OFFICE: &str = "Registered Office";
const STATUS: &str = "Status";
const INITIAL_FILING_DATE: &str = "Initial Filing Date";
const FILING_TYPE: &str = "Filing Type";
const GOVERNORS: &str = "Governors";
const INTERESTED_INDIVIDUALS: &str = "Interested Individuals";

/// The business code segment of a details URL, e.g. `1234` in
/// `.../api/FilingDetail/business/1234/false`.
pub fn business_code(url: &str) -> Option<&str> {
    BUSINESS_CODE_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Replace the numeric business segment of `url` with `id`.
///
/// Alphanumeric segments are left alone.
pub fn rewrite_business_segment(url: &str, id: &str) -> String {
    BUSINESS_SEGMENT_RE
        .replace_all(url, |caps: &Captures| format!("{}{id}{}", &caps[1], &caps[2]))
        .into_owned()
}

pub fn search_results(rows: &[(String, SearchRow)], config: &Config) -> Vec<SearchResult> {
    rows.iter()
        .map(|(key, row)| {
            let record_num = row.record_num();
            if record_num.trim().is_empty() {
                debug!(row = %key, "search row has no RECORD_NUM, details url has no business code");
            }
            SearchResult {
                state: config.state.clone(),
                name: row.title().trim().to_string(),
                status: row.status().trim().to_string(),
                id: key.clone(),
                url: config.detail_url(record_num.trim().trim_start_matches('0')),
            }
        })
        .collect()
}

/// First row of a search response as an `EntityReference`. Later rows are ignored.
pub fn first_reference(rows: &[(String, SearchRow)]) -> Option<EntityReference> {
    rows.first().map(|(key, row)| EntityReference {
        record_num: row.record_num().trim().to_string(),
        id: key.clone(),
        name: row.title().trim().to_string(),
        agent: row.agent().trim().to_string(),
    })
}

/// Build the entity profile from the drawer detail list.
///
/// `registered_office` shares its guard with `date_registered`: it is only set when
/// the filing date is non-empty, and is then set even if the office itself is blank.
pub fn entity_detail(
    state: &str,
    reference: &EntityReference,
    drawer: &[DrawerItem],
    documents: Vec<Document>,
) -> EntityDetail {
    let labels: HashMap<&str, Option<String>> = drawer
        .iter()
        .map(|item| {
            (
                item.label.as_str(),
                item.value.as_ref().and_then(FieldValue::joined),
            )
        })
        .collect();
    let raw = |label: &str| labels.get(label).cloned().flatten();

    let date_raw = raw(INITIAL_FILING_DATE);
    let registered_office = match &date_raw {
        Some(date) if !date.is_empty() => {
            Some(raw(REGISTERED_OFFICE).unwrap_or_default().trim().to_string())
        }
        _ => None,
    };

    EntityDetail {
        state: state.to_string(),
        name: reference.name.clone(),
        governors: present(raw(GOVERNORS)),
        interested_individuals: present(raw(INTERESTED_INDIVIDUALS)),
        status: present(raw(STATUS)),
        registration_number: reference.id.clone(),
        registered_office,
        date_registered: present(date_raw),
        entity_type: present(raw(FILING_TYPE)),
        agent_name: present(Some(reference.agent.clone())),
        principal_address: present(raw(PRINCIPAL_ADDRESS)),
        mailing_address: present(raw(MAILING_ADDRESS)),
        document_images: documents,
    }
}

/// Keep entries that carry a download link, a type and a date; drop the rest.
pub fn documents(amendments: &[Value], base_url: &str) -> Vec<Document> {
    amendments
        .iter()
        .filter_map(|amendment| {
            let link = amendment.get("DOWNLOAD_LINK")?.as_str()?;
            let name = amendment.get("AMENDMENT_TYPE")?.as_str()?;
            let date = amendment.get("AMENDMENT_DATE")?.as_str()?;
            Some(Document {
                name: name.trim().to_string(),
                date: date.trim().to_string(),
                link: format!("{base_url}{}", link.trim()),
            })
        })
        .collect()
}

// Empty raw values read as absent; anything else is trimmed.
fn present(value: Option<String>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::search_rows;
    use serde_json::json;

    fn config() -> Config {
        Config::new("PA", "https://file.dos.pa.gov").unwrap()
    }

    fn drawer(items: Value) -> Vec<DrawerItem> {
        serde_json::from_value(items).unwrap()
    }

    fn reference() -> EntityReference {
        EntityReference {
            record_num: "0001234".to_string(),
            id: "778899".to_string(),
            name: "Acme Inc".to_string(),
            agent: "  John Doe ".to_string(),
        }
    }

    #[test]
    fn test_business_code() {
        assert_eq!(
            business_code("https://file.dos.pa.gov/api/FilingDetail/business/1234/false"),
            Some("1234")
        );
        assert_eq!(
            business_code("https://file.dos.pa.gov/api/FilingDetail/business/AB12/false"),
            Some("AB12")
        );
        assert_eq!(business_code("https://file.dos.pa.gov/api/FilingDetail/1234"), None);
        assert_eq!(business_code("https://x/business/ab12/false"), None);
    }

    #[test]
    fn test_rewrite_business_segment() {
        assert_eq!(
            rewrite_business_segment(
                "https://file.dos.pa.gov/api/FilingDetail/business/1234/false",
                "778899"
            ),
            "https://file.dos.pa.gov/api/FilingDetail/business/778899/false"
        );
        // Only purely numeric segments are rewritten.
        assert_eq!(
            rewrite_business_segment("https://x/business/AB12/false", "778899"),
            "https://x/business/AB12/false"
        );
        assert_eq!(
            rewrite_business_segment("https://x/smallbusiness/1234/false", "778899"),
            "https://x/smallbusiness/1234/false"
        );
    }

    #[test]
    fn search_results_strip_record_leading_zeros_and_trim() {
        let rows = search_rows(json!({"rows": {
            "778899": {"TITLE": ["  Acme Inc "], "STATUS": " Active ", "RECORD_NUM": "0001234"},
            "112233": {}
        }}))
        .unwrap();
        let results = search_results(&rows, &config());

        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            SearchResult {
                state: "PA".to_string(),
                name: "Acme Inc".to_string(),
                status: "Active".to_string(),
                id: "778899".to_string(),
                url: "https://file.dos.pa.gov/api/FilingDetail/business/1234/false".to_string(),
            }
        );
        assert_eq!(results[1].name, "");
        assert_eq!(results[1].status, "");
        assert_eq!(results[1].id, "112233");
        assert_eq!(
            results[1].url,
            "https://file.dos.pa.gov/api/FilingDetail/business//false"
        );
        assert_eq!(business_code(&results[1].url), None);
    }

    #[test]
    fn first_reference_takes_first_row_only() {
        let rows = search_rows(json!({"rows": {
            "778899": {"TITLE": ["Acme Inc"], "STATUS": "Active", "RECORD_NUM": "0001234", "AGENT": "John Doe"},
            "112233": {"TITLE": ["Acme Holdings"], "RECORD_NUM": "0001235", "AGENT": "Jane Roe"}
        }}))
        .unwrap();
        assert_eq!(
            first_reference(&rows),
            Some(EntityReference {
                record_num: "0001234".to_string(),
                id: "778899".to_string(),
                name: "Acme Inc".to_string(),
                agent: "John Doe".to_string(),
            })
        );
        assert_eq!(first_reference(&[]), None);
    }

    #[test]
    fn entity_detail_maps_labels() {
        let items = drawer(json!([
            {"LABEL": "Mailing Address", "VALUE": " 1 Main St, Harrisburg PA "},
            {"LABEL": "Principal Address", "VALUE": "2 Market St"},
            {"LABEL": "Registered Office", "VALUE": " 3 State St "},
            {"LABEL": "Status", "VALUE": "Active "},
            {"LABEL": "Initial Filing Date", "VALUE": " 01/02/2003"},
            {"LABEL": "Filing Type", "VALUE": "Business Corporation"},
            {"LABEL": "Governors", "VALUE": "Jane Roe"},
            {"LABEL": "Interested Individuals", "VALUE": "John Doe"},
            {"LABEL": "Citizenship", "VALUE": "Domestic"}
        ]));
        let docs = vec![Document {
            name: "Amendment".to_string(),
            date: "2020-01-01".to_string(),
            link: "https://file.dos.pa.gov/doc/1".to_string(),
        }];
        let detail = entity_detail("PA", &reference(), &items, docs.clone());

        assert_eq!(
            detail,
            EntityDetail {
                state: "PA".to_string(),
                name: "Acme Inc".to_string(),
                governors: Some("Jane Roe".to_string()),
                interested_individuals: Some("John Doe".to_string()),
                status: Some("Active".to_string()),
                registration_number: "778899".to_string(),
                registered_office: Some("3 State St".to_string()),
                date_registered: Some("01/02/2003".to_string()),
                entity_type: Some("Business Corporation".to_string()),
                agent_name: Some("John Doe".to_string()),
                principal_address: Some("2 Market St".to_string()),
                mailing_address: Some("1 Main St, Harrisburg PA".to_string()),
                document_images: docs,
            }
        );
    }

    #[test]
    fn registered_office_follows_date_registered() {
        let without_date = drawer(json!([
            {"LABEL": "Registered Office", "VALUE": "3 State St"}
        ]));
        let detail = entity_detail("PA", &reference(), &without_date, Vec::new());
        assert_eq!(detail.date_registered, None);
        assert_eq!(detail.registered_office, None);

        let empty_date = drawer(json!([
            {"LABEL": "Registered Office", "VALUE": "3 State St"},
            {"LABEL": "Initial Filing Date", "VALUE": ""}
        ]));
        let detail = entity_detail("PA", &reference(), &empty_date, Vec::new());
        assert_eq!(detail.registered_office, None);

        let date_only = drawer(json!([
            {"LABEL": "Initial Filing Date", "VALUE": "01/02/2003"}
        ]));
        let detail = entity_detail("PA", &reference(), &date_only, Vec::new());
        assert_eq!(detail.date_registered.as_deref(), Some("01/02/2003"));
        assert_eq!(detail.registered_office.as_deref(), Some(""));
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let reference = EntityReference {
            agent: String::new(),
            ..reference()
        };
        let detail = entity_detail("PA", &reference, &[], Vec::new());
        let value = serde_json::to_value(&detail).unwrap();

        for key in [
            "governors",
            "interested_individuals",
            "status",
            "registered_office",
            "date_registered",
            "entity_type",
            "agent_name",
            "principal_address",
            "mailing_address",
        ] {
            assert_eq!(value.get(key), Some(&Value::Null), "{key} should be null");
        }
        assert_eq!(value["document_images"], json!([]));
    }

    #[test]
    fn list_valued_people_keep_every_name() {
        let items = drawer(json!([
            {"LABEL": "Governors", "VALUE": ["Jane Roe", "John Doe", "Max Poe"]},
            {"LABEL": "Interested Individuals", "VALUE": [" Ann Lee ", "Bo Kim"]},
            {"LABEL": "Status", "VALUE": ["Active"]}
        ]));
        let detail = entity_detail("PA", &reference(), &items, Vec::new());
        assert_eq!(
            detail.governors.as_deref(),
            Some("Jane Roe\nJohn Doe\nMax Poe")
        );
        assert_eq!(
            detail.interested_individuals.as_deref(),
            Some("Ann Lee\nBo Kim")
        );
        assert_eq!(detail.status.as_deref(), Some("Active"));
    }

    #[test]
    fn later_duplicate_labels_win() {
        let items = drawer(json!([
            {"LABEL": "Status", "VALUE": "Active"},
            {"LABEL": "Status", "VALUE": "Inactive"}
        ]));
        let detail = entity_detail("PA", &reference(), &items, Vec::new());
        assert_eq!(detail.status.as_deref(), Some("Inactive"));
    }

    #[test]
    fn malformed_amendments_are_skipped_individually() {
        let amendments = vec![
            json!({"DOWNLOAD_LINK": "/api/report/1", "AMENDMENT_TYPE": "Articles ", "AMENDMENT_DATE": " 01/02/2003"}),
            json!({"AMENDMENT_TYPE": "No Link", "AMENDMENT_DATE": "01/02/2004"}),
            json!({"DOWNLOAD_LINK": "/api/report/3", "AMENDMENT_DATE": "01/02/2005"}),
            json!({"DOWNLOAD_LINK": "/api/report/4", "AMENDMENT_TYPE": "No Date"}),
            json!({"DOWNLOAD_LINK": null, "AMENDMENT_TYPE": "Null Link", "AMENDMENT_DATE": "01/02/2006"}),
            json!("not an object"),
            json!({"DOWNLOAD_LINK": "/api/report/7", "AMENDMENT_TYPE": "Annual Report", "AMENDMENT_DATE": "01/02/2007"}),
        ];
        let docs = documents(&amendments, "https://file.dos.pa.gov");
        assert_eq!(
            docs,
            vec![
                Document {
                    name: "Articles".to_string(),
                    date: "01/02/2003".to_string(),
                    link: "https://file.dos.pa.gov/api/report/1".to_string(),
                },
                Document {
                    name: "Annual Report".to_string(),
                    date: "01/02/2007".to_string(),
                    link: "https://file.dos.pa.gov/api/report/7".to_string(),
                },
            ]
        );
    }
}
