//! Admission control configuration.

use serde::{Deserialize, Serialize};

/// How the counter expiry behaves across hits inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Expiry is set only when a hit opens the window.
    #[default]
    Fixed,
    /// Expiry is pushed out on every hit; sustained traffic keeps the window open.
    Rearm,
}

/// Per-IP rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether admission control is applied at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum admitted requests per window.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Window length in seconds.
    #[serde(default = "default_window")]
    pub window_seconds: u64,
    /// Expiry behaviour.
    #[serde(default)]
    pub window_mode: WindowMode,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_limit(),
            window_seconds: default_window(),
            window_mode: WindowMode::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_limit() -> u32 {
    60
}

fn default_window() -> u64 {
    60
}
