use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "quickline.toml";
const ENV_PREFIX: &str = "QUICKLINE__";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkflowSettings {
    pub service_url: String,
    pub page_size: usize,
    pub search_debounce_ms: u64,
    pub page_reload_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Drop catalog responses that settle after a newer fetch was issued.
    pub discard_stale_responses: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8080".into(),
            page_size: 50,
            search_debounce_ms: 500,
            page_reload_delay_ms: 1500,
            request_timeout_secs: 30,
            discard_stale_responses: true,
        }
    }
}

impl WorkflowSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn page_reload_delay(&self) -> Duration {
        Duration::from_millis(self.page_reload_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Applies `QUICKLINE__*` overrides from `lookup`. Values that do not
    /// parse are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(v) = var("SERVICE_URL") {
            self.service_url = v;
        }
        if let Some(v) = var("PAGE_SIZE").and_then(|v| v.trim().parse().ok()) {
            self.page_size = v;
        }
        if let Some(v) = var("SEARCH_DEBOUNCE_MS").and_then(|v| v.trim().parse().ok()) {
            self.search_debounce_ms = v;
        }
        if let Some(v) = var("PAGE_RELOAD_DELAY_MS").and_then(|v| v.trim().parse().ok()) {
            self.page_reload_delay_ms = v;
        }
        if let Some(v) = var("REQUEST_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.request_timeout_secs = v;
        }
        if let Some(v) = var("DISCARD_STALE_RESPONSES").and_then(|v| v.trim().parse().ok()) {
            self.discard_stale_responses = v;
        }

        self.normalize();
    }

    fn normalize(&mut self) {
        if self.page_size == 0 {
            self.page_size = Self::default().page_size;
        }
        let trimmed = self.service_url.trim();
        if trimmed.is_empty() {
            self.service_url = Self::default().service_url;
        } else if trimmed.len() != self.service_url.len() {
            self.service_url = trimmed.to_string();
        }
    }
}

pub fn load_settings_file(path: &Path) -> anyhow::Result<WorkflowSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let mut settings: WorkflowSettings = toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    settings.normalize();
    Ok(settings)
}

/// Defaults, then `quickline.toml` in the working directory when present,
/// then environment overrides.
pub fn load_settings() -> WorkflowSettings {
    let path = Path::new(SETTINGS_FILE);
    let mut settings = if path.exists() {
        match load_settings_file(path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable settings file");
                WorkflowSettings::default()
            }
        }
    } else {
        WorkflowSettings::default()
    };

    settings.apply_overrides(|key| std::env::var(key).ok());
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
