use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set. `--verbose` beats a configured level.
fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (true, _) => "price_list_etl=debug,info".to_string(),
        (false, Some(level)) => format!("price_list_etl={}", level.trim().to_lowercase()),
        (false, None) => "price_list_etl=info".to_string(),
    }
}

fn default_filter(verbose: bool, log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(filter_directive(verbose, log_level))
            .unwrap_or_else(|_| EnvFilter::new("price_list_etl=info"))
    })
}

pub fn init_cli_logger(verbose: bool) {
    init_cli_logger_with_level(verbose, None);
}

/// Like `init_cli_logger`, with the level from `[monitoring] log_level`.
pub fn init_cli_logger_with_level(verbose: bool, log_level: Option<&str>) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines, for runs driven by a scheduler that collects logs
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, None))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(false, None), "price_list_etl=info");
        assert_eq!(filter_directive(true, None), "price_list_etl=debug,info");
        assert_eq!(filter_directive(false, Some(" WARN ")), "price_list_etl=warn");
        assert_eq!(filter_directive(true, Some("error")), "price_list_etl=debug,info");
    }

    #[test]
    fn test_configured_level_builds_a_filter() {
        assert!(EnvFilter::try_new(filter_directive(false, Some("trace"))).is_ok());
    }
}
