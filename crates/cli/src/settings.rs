use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use ua_client::GrafanaConfig;
use ua_panel::PanelOptions;

/// Settings file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "ua-browser.toml";

pub const ENV_GRAFANA_URL: &str = "UA_BROWSER_GRAFANA_URL";
pub const ENV_GRAFANA_TOKEN: &str = "UA_BROWSER_GRAFANA_TOKEN";
pub const ENV_DATA_SOURCE: &str = "UA_BROWSER_DATA_SOURCE";

/// Everything the binary needs: panel options plus the Grafana connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub panel: PanelOptions,
    pub grafana: GrafanaConfig,
}

impl Settings {
    /// Read `path`, or the default file if it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Apply environment overrides. `var` is `std::env::var` in the binary.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_GRAFANA_URL) {
            self.grafana.base_url = url;
        }
        if let Some(token) = var(ENV_GRAFANA_TOKEN).filter(|token| !token.is_empty()) {
            self.grafana.api_token = Some(token);
        }
        if let Some(name) = var(ENV_DATA_SOURCE) {
            self.panel.data_source = name;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.panel
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid [panel] settings")?;
        self.grafana.validate().context("Invalid [grafana] settings")?;
        Ok(())
    }
}
