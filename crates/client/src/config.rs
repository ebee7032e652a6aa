use crate::error::{ClientError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Connection settings of the Grafana instance hosting the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrafanaConfig {
    /// Base URL, e.g. `http://localhost:3000`
    pub base_url: String,

    /// Service account token sent as a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GrafanaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

impl GrafanaConfig {
    pub fn validate(&self) -> Result<()> {
        let url = self.base()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `segments` appended below `base_url`, each one percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base()?;
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidConfig(format!("base_url '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|err| ClientError::InvalidConfig(format!("base_url '{}': {err}", self.base_url)))
    }
}
