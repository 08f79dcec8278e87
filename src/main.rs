use clap::Parser;
use location_lite::utils::error::ErrorSeverity;
use location_lite::utils::{logger, validation::Validate};
use location_lite::{
    CliConfig, Fix, FixError, InMemoryLocationProvider, LocationApi, LocationManagerLite,
    ProviderId,
};
use std::sync::Arc;
use std::time::Duration;

const SIMULATED_LATITUDE: f64 = 59.3293;
const SIMULATED_LONGITUDE: f64 = 18.0686;
const SIMULATED_ALTITUDE: f64 = 28.0;

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn simulated_provider(config: &CliConfig) -> InMemoryLocationProvider {
    let provider = InMemoryLocationProvider::new();
    provider.add_provider(ProviderId::gps(), !config.disable_gps);
    provider.add_provider(ProviderId::network(), !config.disable_network);
    provider.set_authorized(!config.deny_access);

    if let Some(age) = config.cached_age_ms {
        let timestamp = now_millis() - i64::try_from(age).unwrap_or(i64::MAX);
        provider.set_last_known(
            Fix::new(
                ProviderId::gps(),
                SIMULATED_LATITUDE,
                SIMULATED_LONGITUDE,
                12.0,
                timestamp,
            )
            .with_altitude(SIMULATED_ALTITUDE),
        );
    }
    provider
}

/// Publishes one fix for `id` after `delay_ms`; `None` keeps the provider silent.
fn spawn_simulated_fix(
    provider: Arc<InMemoryLocationProvider>,
    id: ProviderId,
    delay_ms: Option<u64>,
    accuracy: f32,
) {
    let Some(delay_ms) = delay_ms else {
        return;
    };

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        tracing::debug!("Simulated provider '{}' producing a fix", id);
        provider.publish_fix(Fix::new(
            id,
            SIMULATED_LATITUDE,
            SIMULATED_LONGITUDE,
            accuracy,
            now_millis(),
        ));
    });
}

fn exit_code(error: &FixError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let log_settings = match config.log_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };
    if log_settings.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(log_settings.verbose);
    }

    tracing::info!("Starting location-lite");
    if log_settings.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    let fetch_config = config.fetch_config()?;
    let provider = Arc::new(simulated_provider(&config));
    let manager = LocationManagerLite::new(provider.clone(), fetch_config)?;

    spawn_simulated_fix(provider.clone(), ProviderId::gps(), config.gps_delay_ms, 8.0);
    spawn_simulated_fix(
        provider.clone(),
        ProviderId::network(),
        config.network_delay_ms,
        45.0,
    );

    let api = manager.provide();
    let response = tokio::select! {
        response = api.get_fix() => response,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, request cancelled");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    match response.into_parts() {
        (Some(fix), _) => {
            tracing::info!(
                "✅ Fix from '{}': {:.5}, {:.5} (±{:.1} m)",
                fix.provider,
                fix.latitude,
                fix.longitude,
                fix.accuracy
            );
            Ok(())
        }
        (None, message) => {
            tracing::error!("❌ {}", message.as_deref().unwrap_or("No fix available"));
            std::process::exit(2);
        }
    }
}
