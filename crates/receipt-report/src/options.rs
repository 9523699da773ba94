use crate::constants::{DEFAULT_CURRENCY, DEFAULT_JPEG_QUALITY, DEFAULT_TITLE};
use crate::types::*;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Report compilation configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReportOptions {
    // Summary page
    pub title: String,
    pub currency: String,

    // Raster receipts
    pub jpeg_quality: u8,
    /// Longest side in pixels before re-encoding; `None` keeps the original size
    pub max_image_dimension: Option<u32>,

    // Whole-call deadline, only honoured by the async entry point
    pub deadline_secs: Option<u64>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_image_dimension: None,
            deadline_secs: None,
        }
    }
}

impl ReportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ReportError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate options
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ReportError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        if self.currency.trim().is_empty() {
            return Err(ReportError::Config("Currency must not be empty".to_string()));
        }

        if self.max_image_dimension == Some(0) {
            return Err(ReportError::Config(
                "Maximum image dimension must be positive".to_string(),
            ));
        }

        if self.deadline_secs == Some(0) {
            return Err(ReportError::Config("Deadline must be positive".to_string()));
        }

        Ok(())
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}
