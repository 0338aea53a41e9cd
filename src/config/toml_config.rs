use crate::config::{
    default_currency, default_exchange_rate, default_input_files, default_output_path,
    validate_provider,
};
use crate::core::{ConfigProvider, RecordErrorPolicy};
use crate::domain::pricing::MarkupTable;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "price-list".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_files")]
    pub files: Vec<String>,
    #[serde(default)]
    pub on_record_error: RecordErrorPolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            files: default_input_files(),
            on_record_error: RecordErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Target currency units per 100 source units
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Fraction used for price groups missing from `markups`
    pub default_markup: Option<Decimal>,
    /// Price group -> markup fraction, replaces the built-in table when present
    pub markups: Option<BTreeMap<String, Decimal>>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            exchange_rate: default_exchange_rate(),
            currency: default_currency(),
            default_markup: None,
            markups: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRICE_LIST_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Built-in table unless `[pricing.markups]` is given.
    pub fn build_markup_table(&self) -> Result<MarkupTable> {
        let standard = MarkupTable::standard();
        let default_markup = self
            .pricing
            .default_markup
            .unwrap_or_else(|| standard.default_markup());

        let Some(markups) = &self.pricing.markups else {
            return Ok(MarkupTable::new(standard.groups().collect(), default_markup));
        };

        let mut table = BTreeMap::new();
        for (group, markup) in markups {
            let group: i32 = group
                .trim()
                .parse()
                .map_err(|_| EtlError::InvalidConfigValueError {
                    field: "pricing.markups".to_string(),
                    value: group.clone(),
                    reason: "Price group must be an integer".to_string(),
                })?;
            table.insert(group, *markup);
        }
        Ok(MarkupTable::new(table, default_markup))
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_provider(self)?;
        validation::validate_file_extensions("input.files", &self.input.files, &["csv", "txt"])?;

        let table = self.build_markup_table()?;
        let max_markup = Decimal::new(10, 0);
        validation::validate_range(
            "pricing.default_markup",
            table.default_markup(),
            Decimal::ZERO,
            max_markup,
        )?;
        for (_, markup) in table.groups() {
            validation::validate_range("pricing.markups", markup, Decimal::ZERO, max_markup)?;
        }

        if let Some(level) = self.log_level() {
            if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Expected one of {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// `[monitoring] log_level`, a `tracing` filter directive such as "debug".
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_files(&self) -> &[String] {
        &self.input.files
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn exchange_rate(&self) -> Decimal {
        self.pricing.exchange_rate
    }

    fn currency(&self) -> &str {
        &self.pricing.currency
    }

    fn on_record_error(&self) -> RecordErrorPolicy {
        self.input.on_record_error
    }

    fn markup_table(&self) -> MarkupTable {
        // validate() rejects bad group keys before a pipeline is built
        match self.build_markup_table() {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("⚠️ {}, using the standard markup table", e);
                MarkupTable::standard()
            }
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::MarkupLookup;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "weekly-import"

[input]
files = ["leverandor_a.csv", "leverandor_b.csv"]
on_record_error = "skip_file"

[pricing]
exchange_rate = 745.8
currency = "DKK"

[output]
path = "./out/ny_prisliste.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "weekly-import");
        assert_eq!(config.input_files(), ["leverandor_a.csv", "leverandor_b.csv"]);
        assert_eq!(config.on_record_error(), RecordErrorPolicy::SkipFile);
        assert_eq!(config.exchange_rate(), Decimal::new(7458, 1));
        assert_eq!(config.output_path(), "./out/ny_prisliste.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.input_files(), ["prisliste1.csv", "prisliste2.csv"]);
        assert_eq!(config.exchange_rate(), Decimal::new(746, 0));
        assert_eq!(config.currency(), "DKK");
        assert_eq!(config.on_record_error(), RecordErrorPolicy::SkipRecord);
        assert_eq!(config.markup_table(), MarkupTable::standard());
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_markup_override() {
        let toml_content = r#"
[pricing]
default_markup = 0.25

[pricing.markups]
"21" = 0.35
"30" = 1.0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let table = config.markup_table();

        assert_eq!(table.lookup(21), MarkupLookup::Table(Decimal::new(35, 2)));
        assert_eq!(table.lookup(30), MarkupLookup::Table(Decimal::ONE));
        assert_eq!(table.lookup(22), MarkupLookup::Fallback(Decimal::new(25, 2)));
    }

    #[test]
    fn test_invalid_markup_group_fails_validation() {
        let toml_content = r#"
[pricing.markups]
"group-a" = 0.3
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_markup_group_falls_back_to_standard_table() {
        let toml_content = r#"
[pricing]
default_markup = 0.9

[pricing.markups]
"group-a" = 0.3
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.build_markup_table().is_err());
        assert_eq!(config.markup_table(), MarkupTable::standard());
    }

    #[test]
    fn test_monitoring_log_level() {
        let toml_content = r#"
[monitoring]
enabled = true
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(TomlConfig::from_toml_str("").unwrap().log_level(), None);
    }

    #[test]
    fn test_unknown_log_level_fails_validation() {
        let toml_content = r#"
[monitoring]
enabled = false
log_level = "chatty"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { ref field, .. }) if field == "monitoring.log_level"
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRICE_LIST_TEST_OUT", "/tmp/price-list-test");

        let toml_content = r#"
[output]
path = "${PRICE_LIST_TEST_OUT}/ny_prisliste.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.path, "/tmp/price-list-test/ny_prisliste.csv");

        std::env::remove_var("PRICE_LIST_TEST_OUT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[input]
files = ["prisliste.xlsx"]

[pricing]
exchange_rate = -1
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[input]
files = ["a.csv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert_eq!(config.input_files(), ["a.csv"]);
    }
}
