//! Estimator configuration.

use mbae_core::{ErrorInfo, MbaeError, OpSig};
use serde::{Deserialize, Serialize};

fn default_ranksigs() -> Vec<String> {
    vec!["2200".to_string()]
}

fn default_store_row_estimate_factor() -> f64 {
    1.0
}

fn default_grow_factor() -> f64 {
    1.5
}

fn default_norm_tolerance() -> f64 {
    1e-6
}

/// Buffer sizing policy shared by the send buffers and the persistent store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Scale applied to the combinatorial row-count estimate when sizing the
    /// initial buffers.
    #[serde(default = "default_store_row_estimate_factor")]
    pub store_row_estimate_factor: f64,
    /// Geometric growth factor applied when a buffer saturates.
    #[serde(default = "default_grow_factor")]
    pub grow_factor: f64,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            store_row_estimate_factor: default_store_row_estimate_factor(),
            grow_factor: default_grow_factor(),
        }
    }
}

/// Configuration of the active estimator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdmConfig {
    /// Active rank signatures as four-digit strings ("2200" style).
    #[serde(default = "default_ranksigs")]
    pub ranksigs: Vec<String>,
    /// Buffer sizing policy.
    #[serde(default)]
    pub buffers: BufferConfig,
    /// Relative tolerance of the trace against total-norm consistency check
    /// at energy contraction.
    #[serde(default = "default_norm_tolerance")]
    pub norm_tolerance: f64,
}

impl Default for RdmConfig {
    fn default() -> Self {
        Self {
            ranksigs: default_ranksigs(),
            buffers: BufferConfig::default(),
            norm_tolerance: default_norm_tolerance(),
        }
    }
}

impl RdmConfig {
    /// Parses the configured rank signature strings.
    pub fn parse_ranksigs(&self) -> Result<Vec<OpSig>, MbaeError> {
        self.ranksigs
            .iter()
            .map(|text| {
                OpSig::parse(text).ok_or_else(|| {
                    let info = ErrorInfo::new("ranksig-unparseable", "invalid rank signature")
                        .with_context("ranksig", text.clone())
                        .with_hint("rank signatures are four digits, e.g. \"2200\"");
                    MbaeError::Accumulation(info)
                })
            })
            .collect()
    }
}
