use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub notifications: NotificationConfig,
    pub search: SearchConfig,
    pub security: SecurityConfig,
    pub export: ExportConfig,
    pub print: PrintConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long an alert stays up before auto-dismissal, in ms
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Trailing debounce window for search input, in ms
    pub debounce_ms: u64,

    /// Queries shorter than this are ignored
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Name of the cookie carrying the CSRF token
    pub csrf_cookie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Stem for generated CSV download names
    pub filename_stem: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Stylesheet linked into composed print documents
    pub stylesheet_href: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            notifications: NotificationConfig::default(),
            search: SearchConfig::default(),
            security: SecurityConfig::default(),
            export: ExportConfig::default(),
            print: PrintConfig::default(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_ms: 5000 }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            csrf_cookie: "csrftoken".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            filename_stem: "export".to_string(),
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            stylesheet_href: "/static/css/style.css".to_string(),
        }
    }
}

impl PageConfig {
    /// Load config from the default location, creating it with defaults
    /// on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("page-kit").join("config.toml"))
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notifications.ttl_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_behavior() {
        let config = PageConfig::default();
        assert_eq!(config.notification_ttl(), Duration::from_millis(5000));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.security.csrf_cookie, "csrftoken");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PageConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: PageConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.notifications.ttl_ms, config.notifications.ttl_ms);
        assert_eq!(parsed.print.stylesheet_href, config.print.stylesheet_href);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let parsed: PageConfig = toml::from_str("[search]\ndebounce_ms = 150\n").unwrap();
        assert_eq!(parsed.search.debounce_ms, 150);
        assert_eq!(parsed.search.min_query_len, 2);
        assert_eq!(parsed.notifications.ttl_ms, 5000);
    }

    #[test]
    fn test_first_load_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page-kit").join("config.toml");
        let config = PageConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.notifications.ttl_ms, 5000);
        // Second load reads the file it just wrote
        let again = PageConfig::load_from(&path).unwrap();
        assert_eq!(again.search.debounce_ms, 300);
    }
}
