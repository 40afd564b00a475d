use chrono_tz::Tz;
use engine::Currency;
use serde::Deserialize;

use crate::{
    cli::Cli,
    error::{AppError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/mera.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the expense blob.
    pub data_dir: String,
    pub currency: String,
    /// IANA name; decides what "today" means.
    pub timezone: String,
    pub level: String,
    /// TrueType font embedded in PDF exports; needed for non-Latin text.
    pub pdf_font: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            currency: "INR".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            level: "info".to_string(),
            pdf_font: None,
        }
    }
}

impl Settings {
    pub fn currency(&self) -> Result<Currency> {
        Ok(Currency::try_from(self.currency.as_str())?)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

/// Layers the optional TOML file, `MERA_*` variables and command-line flags,
/// later sources winning.
pub fn load(cli: &Cli) -> Result<Settings> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MERA"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(data_dir) = &cli.data_dir {
        settings.data_dir = data_dir.clone();
    }
    if let Some(currency) = &cli.currency {
        settings.currency = currency.clone();
    }
    if let Some(timezone) = &cli.timezone {
        settings.timezone = timezone.clone();
    }
    if let Some(level) = &cli.level {
        settings.level = level.clone();
    }
    if let Some(pdf_font) = &cli.pdf_font {
        settings.pdf_font = Some(pdf_font.clone());
    }

    Ok(settings)
}
