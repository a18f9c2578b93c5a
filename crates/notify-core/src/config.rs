//! Configuration management for the notification service

use crate::error::{NotifyError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub supabase: SupabaseConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(alias = "url")] // Accept both 'base_url' and 'url'
    pub base_url: String,

    #[serde(alias = "key")] // Accept both 'service_key' and 'key'
    pub service_key: String,
}

/// Resend credentials. Both fields empty means sending is disabled; the
/// workflow treats that as a soft no-op, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub api_key: String,

    /// Verified sender address, e.g. `Infinity8 <bookings@infinity8.my>`
    #[serde(default)]
    pub from: String,

    #[serde(default = "default_email_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    /// Directory holding the regular/bold/italic TTF variants
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: String,

    #[serde(default = "default_font_name")]
    pub font_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from: String::new(),
            base_url: default_email_base_url(),
        }
    }
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            fonts_dir: default_fonts_dir(),
            font_name: default_font_name(),
        }
    }
}

// Default functions
fn default_email_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_fonts_dir() -> String {
    "/app/fonts".to_string()
}

fn default_font_name() -> String {
    "LiberationSans".to_string()
}

impl EmailConfig {
    /// Whether provider credentials are present
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.from.is_empty()
    }
}

impl NotifyConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NotifyError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: NotifyConfig = serde_json::from_str(json)
            .map_err(|e| NotifyError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            supabase: SupabaseConfig {
                base_url: std::env::var("SUPABASE_URL").unwrap_or_default(),
                service_key: std::env::var("SUPABASE_SERVICE_KEY").unwrap_or_default(),
            },
            email: EmailConfig {
                api_key: std::env::var("RESEND_API_KEY").unwrap_or_default(),
                from: std::env::var("RESEND_FROM").unwrap_or_default(),
                base_url: std::env::var("RESEND_API_URL")
                    .unwrap_or_else(|_| default_email_base_url()),
            },
            receipt: ReceiptConfig {
                fonts_dir: std::env::var("RECEIPT_FONTS_DIR").unwrap_or_else(|_| default_fonts_dir()),
                font_name: std::env::var("RECEIPT_FONT_NAME").unwrap_or_else(|_| default_font_name()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Email credentials are not checked here;
    /// their absence only disables sending.
    pub fn validate(&self) -> Result<()> {
        if self.supabase.base_url.is_empty() {
            return Err(NotifyError::Config("Supabase URL is required".to_string()));
        }

        if self.supabase.service_key.is_empty() {
            return Err(NotifyError::Config(
                "Supabase service key is required".to_string(),
            ));
        }

        Ok(())
    }
}
