//! # Shell Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_LOG=till_service=debug                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else TILL_CONFIG, else                            │
//! │     ~/.config/till/till.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.till.till/till.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     standard catalog, embedded rules, log filter "info"                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # till.toml
//! [log]
//! filter = "info,till_store=debug"
//!
//! # Replaces the standard catalog when present
//! [products.TSHIRT]
//! name = "Summer T-Shirt"
//! price_cents = 2000
//!
//! # Replaces the embedded rules when present; an empty [rules] table
//! # disables promotions
//! [rules.buy_three_or_more_new_price]
//! product = "TSHIRT"
//! quantity = 3
//! effect = "bulk_price"
//! newPrice = 19.00
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use till_core::{Catalog, ConfigError, Money, Product, RuleCatalog, RuleDefinition};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TILL_CONFIG";

/// Environment variable overriding `log.filter`.
pub const LOG_ENV: &str = "TILL_LOG";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ShellConfigError {
    #[error("Could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidLogFilter { filter: String, reason: String },

    #[error(transparent)]
    Catalog(#[from] ConfigError),
}

pub type ShellConfigResult<T> = Result<T, ShellConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directives.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: default_log_filter(),
        }
    }
}

/// One `[products.<CODE>]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductEntry {
    pub name: String,
    pub price_cents: i64,
}

// =============================================================================
// Shell Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    #[serde(default)]
    pub log: LogSettings,

    /// Product catalog; `None` means the standard catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<BTreeMap<String, ProductEntry>>,

    /// Promotion rules; `None` means the embedded defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<BTreeMap<String, RuleDefinition>>,
}

impl ShellConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    ///
    /// An explicitly named file (argument or `TILL_CONFIG`) must exist; the
    /// platform default file is optional.
    pub fn load(config_path: Option<PathBuf>) -> ShellConfigResult<Self> {
        let explicit = config_path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a config document.
    pub fn from_toml(source: &str) -> ShellConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    fn from_file(path: &Path) -> ShellConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ShellConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Checks everything that can be checked without building the catalogs.
    pub fn validate(&self) -> ShellConfigResult<()> {
        EnvFilter::try_new(&self.log.filter).map_err(|e| ShellConfigError::InvalidLogFilter {
            filter: self.log.filter.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = var(LOG_ENV) {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.log.filter = filter;
        }
    }

    /// Builds the product catalog.
    pub fn catalog(&self) -> ShellConfigResult<Catalog> {
        let Some(products) = &self.products else {
            return Ok(Catalog::standard());
        };

        let products = products.iter().map(|(code, entry)| {
            Product::new(code.clone(), entry.name.clone(), Money::from_cents(entry.price_cents))
        });
        Ok(Catalog::from_products(products)?)
    }

    /// Builds the rule catalog, validated against `catalog`.
    pub fn rule_catalog(&self, catalog: &Catalog) -> ShellConfigResult<RuleCatalog> {
        let rules = match &self.rules {
            Some(definitions) => RuleCatalog::from_definitions(definitions.clone(), catalog)?,
            None => RuleCatalog::standard(catalog)?,
        };
        Ok(rules)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "till")
            .map(|dirs| dirs.config_dir().join("till.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::RuleEffect;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::from_toml("").unwrap();
        assert_eq!(config, ShellConfig::default());
        assert_eq!(config.log.filter, "info");

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog, Catalog::standard());
        assert_eq!(config.rule_catalog(&catalog).unwrap().len(), 2);
    }

    #[test]
    fn test_full_document() {
        let config = ShellConfig::from_toml(
            r#"
            [log]
            filter = "debug"

            [products.MUG]
            name = "Coffee Mug"
            price_cents = 899

            [rules.mugs_by_the_dozen]
            description = "Twelve or more mugs cost 6.00 each."
            product = "MUG"
            quantity = 12
            effect = "bulk_price"
            newPrice = 6.00
            "#,
        )
        .unwrap();
        config.validate().unwrap();

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("MUG").unwrap().unit_price.cents(), 899);

        let rules = config.rule_catalog(&catalog).unwrap();
        let rule = rules.get("mugs_by_the_dozen").unwrap();
        assert_eq!(rule.threshold, 12);
        assert_eq!(
            rule.effect,
            RuleEffect::BulkPrice {
                new_unit_price: Money::from_cents(600)
            }
        );
    }

    #[test]
    fn test_empty_rules_table_disables_promotions() {
        let config = ShellConfig::from_toml("[rules]").unwrap();
        let catalog = config.catalog().unwrap();
        assert!(config.rule_catalog(&catalog).unwrap().is_empty());
    }

    #[test]
    fn test_default_rules_need_default_products() {
        let config = ShellConfig::from_toml(
            r#"
            [products.MUG]
            name = "Coffee Mug"
            price_cents = 899
            "#,
        )
        .unwrap();
        let catalog = config.catalog().unwrap();

        assert!(matches!(
            config.rule_catalog(&catalog),
            Err(ShellConfigError::Catalog(ConfigError::UnknownProduct { .. }))
        ));
    }

    #[test]
    fn test_invalid_product_entry() {
        let config = ShellConfig::from_toml(
            r#"
            [products.MUG]
            name = "Coffee Mug"
            price_cents = -1
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.catalog(),
            Err(ShellConfigError::Catalog(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(matches!(
            ShellConfig::from_toml("[server]\nport = 80"),
            Err(ShellConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_log_filter() {
        let mut config = ShellConfig::default();
        config.log.filter = "till=loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ShellConfigError::InvalidLogFilter { .. })
        ));
    }

    #[test]
    fn test_env_override() {
        let mut config = ShellConfig::default();
        config.apply_overrides(|key| (key == LOG_ENV).then(|| "warn".to_string()));
        assert_eq!(config.log.filter, "warn");

        config.apply_overrides(|_| None);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ShellConfig::load(Some(PathBuf::from("/nonexistent/till.toml"))).unwrap_err();
        assert!(matches!(err, ShellConfigError::Read { .. }));
    }
}
