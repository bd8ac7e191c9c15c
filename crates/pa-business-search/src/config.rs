use crate::error::AppError;

const DEFAULT_STATE: &str = "PA";
const DEFAULT_BASE_URL: &str = "https://file.dos.pa.gov";

/// Application configuration loaded explicitly from environment variables.
///
/// Both values have defaults, so the server starts with an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Jurisdiction tag stamped onto every output record (e.g. "PA").
    pub state: String,
    /// Provider root, e.g. "https://file.dos.pa.gov". Never ends with `/`.
    pub base_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `STATE`: jurisdiction tag (default `PA`)
    /// - `PA_DOS_BASE_URL`: provider base URL (default `https://file.dos.pa.gov`)
    pub fn from_env() -> Result<Self, AppError> {
        let state = std::env::var("STATE")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_STATE.to_string());

        let base_url =
            std::env::var("PA_DOS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Self::new(state, &base_url)
    }

    pub fn new(state: impl Into<String>, base_url: &str) -> Result<Self, AppError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "base url must start with http:// or https://, got '{base_url}'"
            )));
        }
        Ok(Self {
            state: state.into(),
            base_url: base_url.to_string(),
        })
    }

    pub fn search_url(&self) -> String {
        format!("{}/api/Records/businesssearch", self.base_url)
    }

    /// Details page for a business, as handed out in search results.
    pub fn detail_url(&self, business_id: &str) -> String {
        format!("{}/api/FilingDetail/business/{business_id}/false", self.base_url)
    }

    pub fn history_url(&self, record_num: &str) -> String {
        format!("{}/api/History/business/{record_num}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_and_builds_endpoints() {
        let config = Config::new("PA", "https://file.dos.pa.gov/").unwrap();
        assert_eq!(config.base_url, "https://file.dos.pa.gov");
        assert_eq!(
            config.search_url(),
            "https://file.dos.pa.gov/api/Records/businesssearch"
        );
        assert_eq!(
            config.detail_url("1234"),
            "https://file.dos.pa.gov/api/FilingDetail/business/1234/false"
        );
        assert_eq!(
            config.history_url("0001234"),
            "https://file.dos.pa.gov/api/History/business/0001234"
        );
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = Config::new("PA", "file.dos.pa.gov").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
