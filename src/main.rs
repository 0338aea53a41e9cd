use clap::Parser;
use price_list_etl::utils::error::ErrorSeverity;
use price_list_etl::utils::{logger, validation::Validate};
use price_list_etl::{CliConfig, EtlEngine, LocalStorage, PriceListPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting price-list-etl");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 相對路徑以工作目錄為準
    let storage = LocalStorage::new(".".to_string());
    let pipeline = PriceListPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(summary) => {
            for issue in &summary.issues {
                eprintln!("⚠️ {}", issue);
            }
            tracing::info!("✅ Price list completed: {} records", summary.records_written);
            println!(
                "✅ Wrote {} records to {}",
                summary.records_written, summary.output_path
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Price list run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
