//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::workspace::Workspace;
use crate::entities::category::PLACEHOLDER_ICON;
use crate::entities::item::DEFAULT_QUANTITY_UNIT;

/// Packlist configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Icon assigned to categories created without one
    pub default_icon: Option<String>,

    /// Quantity unit assigned to items created without one
    pub default_quantity_unit: Option<String>,

    /// Ask before destructive operations (delete, clear, import)
    pub confirm_destructive: Option<bool>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(workspace: Option<&Workspace>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/packlist/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Workspace config (.packlist/config.yaml)
        if let Some(workspace) = workspace {
            let workspace_config_path = workspace.config_path();
            if workspace_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&workspace_config_path) {
                    if let Ok(workspace_config) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(workspace_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(icon) = std::env::var("PACKLIST_DEFAULT_ICON") {
            config.default_icon = Some(icon);
        }
        if std::env::var("PACKLIST_NO_CONFIRM").is_ok() {
            config.confirm_destructive = Some(false);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "packlist")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_icon.is_some() {
            self.default_icon = other.default_icon;
        }
        if other.default_quantity_unit.is_some() {
            self.default_quantity_unit = other.default_quantity_unit;
        }
        if other.confirm_destructive.is_some() {
            self.confirm_destructive = other.confirm_destructive;
        }
    }

    /// Icon for new categories, falling back to the placeholder glyph
    pub fn default_icon(&self) -> &str {
        self.default_icon.as_deref().unwrap_or(PLACEHOLDER_ICON)
    }

    /// Quantity unit for new items
    pub fn default_quantity_unit(&self) -> &str {
        self.default_quantity_unit
            .as_deref()
            .unwrap_or(DEFAULT_QUANTITY_UNIT)
    }

    /// Whether destructive commands should prompt for confirmation
    pub fn confirm_destructive(&self) -> bool {
        self.confirm_destructive.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_icon(), PLACEHOLDER_ICON);
        assert_eq!(config.default_quantity_unit(), DEFAULT_QUANTITY_UNIT);
        assert!(config.confirm_destructive());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            default_icon: Some("🎒".to_string()),
            default_quantity_unit: None,
            confirm_destructive: Some(true),
        };
        base.merge(Config {
            default_icon: Some("⛺".to_string()),
            default_quantity_unit: Some("件".to_string()),
            confirm_destructive: None,
        });

        assert_eq!(base.default_icon(), "⛺");
        assert_eq!(base.default_quantity_unit(), "件");
        assert!(base.confirm_destructive());
    }

    #[test]
    fn test_workspace_config_parses() {
        let yaml = "default_icon: \"⛺\"\nconfirm_destructive: false\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.default_icon(), "⛺");
        assert!(!config.confirm_destructive());
    }
}
