use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Error type
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Lottery settings
// =============================================================================

/// Payouts for each prize tier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrizeTable {
    /// Every digit guessed in the drawn order.
    pub exact: u64,
    /// Every digit guessed, in any order.
    pub unordered: u64,
    /// Paid per matching digit otherwise.
    pub per_digit: u64,
}

impl Default for PrizeTable {
    fn default() -> Self {
        PrizeTable {
            exact: 10_000,
            unordered: 3_000,
            per_digit: 125,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LotteryConfig {
    /// How many unique digits are drawn and guessed.
    pub picks: usize,
    /// Digits are drawn from `0..=max_digit`.
    pub max_digit: u8,
    pub prizes: PrizeTable,
}

impl Default for LotteryConfig {
    fn default() -> Self {
        LotteryConfig {
            picks: 5,
            max_digit: 9,
            prizes: PrizeTable::default(),
        }
    }
}

impl LotteryConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LotteryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded lottery config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Draws are unique, so there must be at least as many digits as picks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.picks == 0 {
            return Err(ConfigError::invalid("picks", "must be at least 1"));
        }
        let available = usize::from(self.max_digit) + 1;
        if self.picks > available {
            return Err(ConfigError::invalid(
                "picks",
                format!("cannot draw {} unique digits from 0..={}", self.picks, self.max_digit),
            ));
        }
        Ok(())
    }
}
