//! # Cart Configuration
//!
//! Settings for the cart store, limits, and amount display.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FAPAS_DB_PATH=/data/fapas.db                                       │
//! │     FAPAS_CART_KEY=cartItems                                           │
//! │     FAPAS_MAX_ITEM_QUANTITY=999                                        │
//! │     FAPAS_MAX_CART_ITEMS=100                                           │
//! │     FAPAS_CURRENCY_SYMBOL=$                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/fapas-store/cart.toml (Linux)                            │
//! │     ~/Library/Application Support/com.fapas.store/cart.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [storage]
//! database_path = "/data/fapas.db"
//! cart_key = "cartItems"
//! max_connections = 2
//!
//! [limits]
//! max_item_quantity = 999
//! max_line_items = 100
//!
//! [display]
//! currency_symbol = "$"
//! decimals = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use fapas_core::{Amount, CartLimits, DEFAULT_CART_KEY, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};
use fapas_db::DbConfig;

use crate::error::{CartError, CartResult};

// =============================================================================
// Storage Settings
// =============================================================================

/// Where and how the cart is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Key the serialized cart lives under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "fapas", "store")
        .map(|dirs| dirs.data_dir().join("fapas.db"))
        .unwrap_or_else(|| PathBuf::from("fapas.db"))
}

fn default_cart_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

fn default_max_connections() -> u32 {
    2
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            database_path: default_database_path(),
            cart_key: default_cart_key(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Limits
// =============================================================================

/// Quantity and line-count caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: u32,

    #[serde(default = "default_max_line_items")]
    pub max_line_items: usize,
}

fn default_max_item_quantity() -> u32 {
    MAX_ITEM_QUANTITY
}

fn default_max_line_items() -> usize {
    MAX_CART_ITEMS
}

impl Default for LimitSettings {
    fn default() -> Self {
        LimitSettings {
            max_item_quantity: default_max_item_quantity(),
            max_line_items: default_max_line_items(),
        }
    }
}

impl From<LimitSettings> for CartLimits {
    fn from(limits: LimitSettings) -> Self {
        CartLimits {
            max_item_quantity: limits.max_item_quantity,
            max_line_items: limits.max_line_items,
        }
    }
}

// =============================================================================
// Display Settings
// =============================================================================

/// How amounts are shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Decimal places shown (amounts are never rounded internally).
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimals() -> u8 {
    2
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            decimals: default_decimals(),
        }
    }
}

// =============================================================================
// Main Cart Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub limits: LimitSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl CartConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CartResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> CartResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| CartError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CartError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| CartError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CartResult<()> {
        if self.storage.cart_key.trim().is_empty() {
            return Err(CartError::InvalidConfig("cart_key must not be empty".into()));
        }

        if self.storage.max_connections == 0 {
            return Err(CartError::InvalidConfig(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.limits.max_item_quantity == 0 {
            return Err(CartError::InvalidConfig(
                "max_item_quantity must be greater than 0".into(),
            ));
        }

        if self.limits.max_line_items == 0 {
            return Err(CartError::InvalidConfig(
                "max_line_items must be greater than 0".into(),
            ));
        }

        if self.display.decimals > 6 {
            return Err(CartError::InvalidConfig(format!(
                "decimals must be at most 6, got {}",
                self.display.decimals
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FAPAS_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = PathBuf::from(path);
        }

        if let Ok(key) = std::env::var("FAPAS_CART_KEY") {
            debug!(key = %key, "Overriding cart key from environment");
            self.storage.cart_key = key;
        }

        if let Ok(max) = std::env::var("FAPAS_MAX_ITEM_QUANTITY") {
            match max.parse::<u32>() {
                Ok(m) => self.limits.max_item_quantity = m,
                Err(_) => warn!(value = %max, "Ignoring non-numeric FAPAS_MAX_ITEM_QUANTITY"),
            }
        }

        if let Ok(max) = std::env::var("FAPAS_MAX_CART_ITEMS") {
            match max.parse::<usize>() {
                Ok(m) => self.limits.max_line_items = m,
                Err(_) => warn!(value = %max, "Ignoring non-numeric FAPAS_MAX_CART_ITEMS"),
            }
        }

        if let Ok(symbol) = std::env::var("FAPAS_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fapas", "store")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the cart limits.
    pub fn cart_limits(&self) -> CartLimits {
        self.limits.into()
    }

    /// Returns a store configuration for the configured database.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.storage.database_path.clone()).max_connections(self.storage.max_connections)
    }

    /// Formats an amount for display, e.g. `$30.00`.
    pub fn format_amount(&self, amount: Amount) -> String {
        amount.format(&self.display.currency_symbol, self.display.decimals)
    }
}
