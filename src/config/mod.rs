pub mod cli;
pub mod toml_config;

use crate::core::{ConfigProvider, RecordErrorPolicy};
use crate::domain::pricing::{ExchangeRate, DEFAULT_CURRENCY};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use rust_decimal::Decimal;
use std::path::PathBuf;

pub const DEFAULT_INPUT_FILES: [&str; 2] = ["prisliste1.csv", "prisliste2.csv"];

pub const OUTPUT_FILE_NAME: &str = "ny_prisliste.csv";

/// `<downloads>/ny_prisliste.csv`, or the working directory when the
/// platform has no download folder.
pub fn default_output_path() -> String {
    dirs::download_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(OUTPUT_FILE_NAME)
        .display()
        .to_string()
}

pub fn default_input_files() -> Vec<String> {
    DEFAULT_INPUT_FILES.iter().map(|f| f.to_string()).collect()
}

pub fn default_exchange_rate() -> Decimal {
    ExchangeRate::default().per_hundred_value()
}

pub fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    if config.input_files().is_empty() {
        tracing::warn!("⚠️ No input files configured, the output will be header-only");
    }
    for file in config.input_files() {
        validation::validate_path("input_files", file)?;
    }
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_positive_decimal("exchange_rate", config.exchange_rate())?;
    validation::validate_non_empty_string("currency", config.currency())?;
    Ok(())
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "price-list-etl")]
    #[command(about = "Recalculate supplier price lists into one DKK price list")]
    pub struct CliConfig {
        /// Input price lists, processed in the given order
        #[arg(long, value_delimiter = ',', default_values_t = default_input_files())]
        pub input_files: Vec<String>,

        #[arg(long, default_value_t = default_output_path())]
        pub output_path: String,

        /// Target currency units per 100 source units
        #[arg(long, default_value_t = default_exchange_rate())]
        pub exchange_rate: Decimal,

        #[arg(long, default_value_t = default_currency())]
        pub currency: String,

        /// What to do with a file when one of its rows cannot be parsed
        #[arg(long, value_enum, default_value_t = RecordErrorPolicy::SkipRecord)]
        pub on_record_error: RecordErrorPolicy,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_files(&self) -> &[String] {
            &self.input_files
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn exchange_rate(&self) -> Decimal {
            self.exchange_rate
        }

        fn currency(&self) -> &str {
            &self.currency
        }

        fn on_record_error(&self) -> RecordErrorPolicy {
            self.on_record_error
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_provider(self)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["price-list-etl"]);
            assert_eq!(config.input_files, vec!["prisliste1.csv", "prisliste2.csv"]);
            assert_eq!(config.exchange_rate, Decimal::new(746, 0));
            assert_eq!(config.currency, "DKK");
            assert_eq!(config.on_record_error, RecordErrorPolicy::SkipRecord);
            assert!(config.output_path.ends_with("ny_prisliste.csv"));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_overrides() {
            let config = CliConfig::parse_from([
                "price-list-etl",
                "--input-files",
                "a.csv,b.csv,c.csv",
                "--exchange-rate",
                "745.5",
                "--on-record-error",
                "skip-file",
                "--output-path",
                "out/list.csv",
            ]);
            assert_eq!(config.input_files.len(), 3);
            assert_eq!(config.exchange_rate, Decimal::new(7455, 1));
            assert_eq!(config.on_record_error, RecordErrorPolicy::SkipFile);
            assert_eq!(config.output_path(), "out/list.csv");
        }

        #[test]
        fn test_zero_exchange_rate_is_rejected() {
            let config = CliConfig::parse_from(["price-list-etl", "--exchange-rate", "0"]);
            assert!(config.validate().is_err());
        }
    }
}
