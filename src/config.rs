//! Configuration types.

use std::path::PathBuf;

/// Service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Profile registry file.
    pub profiles_path: PathBuf,
    /// Menu definition file.
    pub menu_path: PathBuf,
    /// Caption language.
    pub language: String,
    /// Caller number used by the console channel.
    pub msisdn: String,
    /// Item the console session starts at.
    pub entry_item: String,
    /// Port for the REST view; disabled when `None`.
    pub http_port: Option<u16>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profiles_path: PathBuf::from("./profiles.json"),
            menu_path: PathBuf::from("./menu.json"),
            language: "af".to_string(),
            msisdn: "+27000000000".to_string(),
            entry_item: "main".to_string(),
            http_port: None,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            profiles_path: non_empty("FAMILY_PROFILES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.profiles_path),
            menu_path: non_empty("FAMILY_MENU_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.menu_path),
            language: non_empty("FAMILY_LANGUAGE").unwrap_or(defaults.language),
            msisdn: non_empty("FAMILY_MSISDN").unwrap_or(defaults.msisdn),
            entry_item: non_empty("FAMILY_ENTRY_ITEM").unwrap_or(defaults.entry_item),
            http_port: non_empty("FAMILY_HTTP_PORT").and_then(|s| s.trim().parse().ok()),
        }
    }
}
