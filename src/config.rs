use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::report::{DEFAULT_MAX_HISTOGRAM_LENGTH, ReportOptions};
use crate::tokenizer::StopWords;
use crate::utils::NumberFormatOptions;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub report: ReportConfig,
    pub tokenizer: TokenizerConfig,
    pub formatting: FormattingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub default_file: String,
    pub skip_malformed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub owner_name: String,
    pub max_histogram_length: usize,
    pub top_words: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TokenizerConfig {
    pub extra_stop_words: Vec<String>,
    pub replace_builtin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormattingConfig {
    pub number_comma: bool,
    pub locale: String,
    pub decimal_places: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            default_file: "sms.xml".to_string(),
            skip_malformed: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            owner_name: String::new(),
            max_histogram_length: DEFAULT_MAX_HISTOGRAM_LENGTH,
            top_words: 0,
        }
    }
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            number_comma: false,
            locale: "en".to_string(),
            decimal_places: 2,
        }
    }
}

thread_local! {
    static TEST_CONFIG_PATH: RefCell<Option<PathBuf>> = const { RefCell::new(None) };
}

#[cfg(test)]
pub fn set_test_config_path(path: PathBuf) {
    TEST_CONFIG_PATH.with(|p| *p.borrow_mut() = Some(path));
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(test)]
        {
            if let Some(path) = TEST_CONFIG_PATH.with(|p| p.borrow().clone()) {
                return Ok(path);
            }
        }

        Ok(dirs::home_dir()
            .context("Could not find home directory")?
            .join(".smsstats.toml"))
    }

    pub fn load() -> Result<Option<Config>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(Some(config))
    }

    pub fn save(&self, silent: bool) -> Result<()> {
        let config_path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, content).context("Failed to write config file")?;

        if !silent {
            println!("Configuration saved to: {}", config_path.display());
        }

        Ok(())
    }

    pub fn number_format(&self) -> NumberFormatOptions {
        NumberFormatOptions {
            use_comma: self.formatting.number_comma,
            locale: self.formatting.locale.clone(),
            decimal_places: self.formatting.decimal_places,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        let owner = self.report.owner_name.trim();
        ReportOptions {
            number_format: self.number_format(),
            top_words: self.report.top_words,
            max_histogram_length: self.report.max_histogram_length,
            owner_name: (!owner.is_empty()).then(|| owner.to_string()),
        }
    }

    pub fn stop_words(&self) -> StopWords {
        StopWords::from_config(
            &self.tokenizer.extra_stop_words,
            self.tokenizer.replace_builtin,
        )
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    value
        .parse::<bool>()
        .context("Invalid boolean value. Use 'true' or 'false'")
}

// CLI helper functions
pub fn create_default_config(overwrite: bool) -> Result<()> {
    let config = Config::default();
    if !std::fs::exists(Config::config_path()?)? || overwrite {
        config.save(true)?;

        println!("Created default configuration file:");
        println!("   {}", Config::config_path()?.display());
    } else {
        println!("Configuration already exists.  Pass `--overwrite` to overwrite.");
    }

    Ok(())
}

pub fn show_config() -> Result<()> {
    match Config::load()? {
        Some(config) => {
            println!("Current configuration:");
            println!("   Default File: {}", config.input.default_file);
            println!("   Skip Malformed: {}", config.input.skip_malformed);
            println!(
                "   Owner Name: {}",
                if config.report.owner_name.is_empty() {
                    "Not set"
                } else {
                    config.report.owner_name.as_str()
                }
            );
            println!(
                "   Max Histogram Length: {}",
                config.report.max_histogram_length
            );
            println!("   Top Words: {}", config.report.top_words);
            println!(
                "   Extra Stop Words: {}",
                config.tokenizer.extra_stop_words.join(", ")
            );
            println!(
                "   Replace Builtin Stop Words: {}",
                config.tokenizer.replace_builtin
            );
            println!("   Number Comma: {}", config.formatting.number_comma);
            println!("   Locale: {}", config.formatting.locale);
            println!("   Decimal Places: {}", config.formatting.decimal_places);
        }
        None => {
            println!("No configuration file found.");
            println!("   Run 'smsstats config init' to create one.");
        }
    }
    Ok(())
}

pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?.unwrap_or_default();

    match key {
        "default-file" => config.input.default_file = value.to_string(),
        "skip-malformed" => config.input.skip_malformed = parse_bool(value)?,
        "owner-name" => config.report.owner_name = value.trim().to_string(),
        "max-histogram-length" => {
            config.report.max_histogram_length =
                value.parse::<usize>().context("Invalid number value")?;
        }
        "top-words" => {
            config.report.top_words = value.parse::<usize>().context("Invalid number value")?;
        }
        "stop-words" => {
            config.tokenizer.extra_stop_words = value
                .split(',')
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
        }
        "replace-builtin-stop-words" => config.tokenizer.replace_builtin = parse_bool(value)?,
        "number-comma" => config.formatting.number_comma = parse_bool(value)?,
        "locale" => config.formatting.locale = value.to_string(),
        "decimal-places" => {
            config.formatting.decimal_places =
                value.parse::<usize>().context("Invalid number value")?;
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    config.save(false)?;
    Ok(())
}
