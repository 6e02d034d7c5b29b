mod cli;
mod scenario;

use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use amap_config::BridgeSettings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = cli::parse();

    if args.print_default_config {
        print!("{}", amap_config::default_settings_toml());
        return ExitCode::SUCCESS;
    }

    // Settings are read before logging starts so the file's level applies;
    // a load failure is reported once the subscriber is up.
    let loaded = amap_config::load_or_default(args.config.as_deref());
    let fallback = match &loaded {
        Ok(settings) => settings.logging.level.as_directive(),
        Err(_) => "info",
    };
    let log_directive = args.log_level.as_deref().unwrap_or(fallback);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    info!("amap-sim v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load settings, using defaults: {e}");
            BridgeSettings::default()
        }
    };

    let report = match scenario::run(args.platform, args.in_page_container, settings).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("session failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        map_id = %report.map_id,
        ready = report.ready_fired,
        clicks = report.clicks,
        "session finished"
    );

    if args.json {
        let calls: Vec<serde_json::Value> = report
            .calls
            .iter()
            .map(|c| serde_json::json!({ "method": c.method, "args": c.args, "posted": c.posted }))
            .collect();
        match serde_json::to_string_pretty(&calls) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("failed to encode call log: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        for call in &report.calls {
            let kind = if call.posted { "post" } else { "call" };
            println!("{kind:4} {:<24} {}", call.method, call.args);
        }
    }
    ExitCode::SUCCESS
}
