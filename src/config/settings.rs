//! Application settings loading from config.toml
//!
//! The settings file tunes the reorder policy and describes where the order template
//! keeps its product names and quantities. Every key has a default, so a missing file
//! (or a file with only some sections) is valid.

use crate::{
    core::{
        policy::{PriorityBuffer, ReorderPolicy},
        reconcile::TemplateLayout,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default location of the settings file
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Reorder policy constants
    pub policy: PolicyConfig,
    /// Order template layout
    pub template: TemplateConfig,
}

/// `[policy]` section
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Supplier delivery lead time in days
    pub lead_time_days: f64,
    /// Fixed cost of placing one purchase order
    pub order_cost: f64,
    /// Holding cost per unit per year
    pub holding_cost: f64,
    /// Multipliers applied to the reorder point per priority tier
    pub priority_buffer: PriorityBufferConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = ReorderPolicy::default();
        Self {
            lead_time_days: policy.lead_time_days,
            order_cost: policy.order_cost,
            holding_cost: policy.holding_cost,
            priority_buffer: PriorityBufferConfig::default(),
        }
    }
}

/// `[policy.priority_buffer]` section
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PriorityBufferConfig {
    /// Multiplier for low priority products
    pub low: f64,
    /// Multiplier for medium priority products
    pub medium: f64,
    /// Multiplier for high priority products
    pub high: f64,
}

impl Default for PriorityBufferConfig {
    fn default() -> Self {
        let buffer = PriorityBuffer::default();
        Self {
            low: buffer.low,
            medium: buffer.medium,
            high: buffer.high,
        }
    }
}

/// `[template]` section, in 1-based spreadsheet coordinates
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateConfig {
    /// Sheet that holds the order lines
    pub sheet: String,
    /// Column with product names (B = 2)
    pub name_column: usize,
    /// Column receiving the box quantity (H = 8)
    pub quantity_column: usize,
    /// First row holding a product
    pub start_row: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            sheet: "Arequipa".to_string(),
            name_column: 2,
            quantity_column: 8,
            start_row: 4,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::Config {
            message: format!("{name} must be a positive number, got {value}"),
        })
    }
}

impl PolicyConfig {
    /// Validates the section and builds the policy used by recommendation runs.
    pub fn to_policy(&self) -> Result<ReorderPolicy> {
        Ok(ReorderPolicy {
            lead_time_days: positive("policy.lead_time_days", self.lead_time_days)?,
            order_cost: positive("policy.order_cost", self.order_cost)?,
            holding_cost: positive("policy.holding_cost", self.holding_cost)?,
            priority_buffer: PriorityBuffer {
                low: positive("policy.priority_buffer.low", self.priority_buffer.low)?,
                medium: positive("policy.priority_buffer.medium", self.priority_buffer.medium)?,
                high: positive("policy.priority_buffer.high", self.priority_buffer.high)?,
            },
        })
    }
}

impl TemplateConfig {
    /// Validates the section and builds the layout used by the order reconciler.
    pub fn to_layout(&self) -> Result<TemplateLayout> {
        TemplateLayout::new(
            self.sheet.clone(),
            self.name_column,
            self.quantity_column,
            self.start_row,
        )
        .map_err(|e| Error::Config {
            message: format!("Invalid [template] section: {e}"),
        })
    }
}

impl AppConfig {
    /// Checks every section, failing on the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.policy.to_policy()?;
        self.template.to_layout()?;
        Ok(())
    }
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid, a key has the wrong type,
/// or a value fails validation.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads settings from a TOML file, falling back to defaults when the file does not exist.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        info!("No configuration at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}
