use crate::config::{FetchConfig, TomlConfig, DEFAULT_MAX_AGE_MILLIS, DEFAULT_TIMEOUT_MILLIS};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "location-lite")]
#[command(about = "Fetch one location fix from a simulated provider subsystem")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with [fetch] and [logging] sections")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MILLIS)]
    pub timeout_ms: u64,

    #[arg(long, default_value_t = DEFAULT_MAX_AGE_MILLIS)]
    pub max_age_ms: u64,

    #[arg(long, help = "Simulated GPS delay before its first fix; omit to keep GPS silent")]
    pub gps_delay_ms: Option<u64>,

    #[arg(long, help = "Simulated network delay before its first fix; omit to keep it silent")]
    pub network_delay_ms: Option<u64>,

    #[arg(long, help = "Seed a cached GPS fix of this age")]
    pub cached_age_ms: Option<u64>,

    #[arg(long, help = "Disable the simulated GPS provider")]
    pub disable_gps: bool,

    #[arg(long, help = "Disable the simulated network provider")]
    pub disable_network: bool,

    #[arg(long, help = "Simulate missing location authorization")]
    pub deny_access: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Settings from `--config` when given, otherwise from the timing flags.
    pub fn fetch_config(&self) -> Result<FetchConfig> {
        match self.config_file()? {
            Some(file) => Ok(file.fetch),
            None => Ok(FetchConfig::new(self.timeout_ms, self.max_age_ms)),
        }
    }

    /// Logging flags merged with the file's `[logging]` section. A flag set on
    /// the command line always wins.
    pub fn log_settings(&self) -> Result<LogSettings> {
        let mut settings = LogSettings {
            json: self.json_logs,
            verbose: self.verbose,
        };
        if let Some(file) = self.config_file()? {
            settings.json |= file.log_format() == "json";
            settings.verbose |= file.verbose();
        }
        Ok(settings)
    }

    fn config_file(&self) -> Result<Option<TomlConfig>> {
        let Some(path) = &self.config else {
            return Ok(None);
        };
        let file = TomlConfig::from_file(path)?;
        file.validate()?;
        Ok(Some(file))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub json: bool,
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("timeout_ms", self.timeout_ms, 1)?;
        self.fetch_config()?.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_library_defaults() {
        let cli = CliConfig::parse_from(["location-lite"]);

        assert_eq!(cli.fetch_config().unwrap(), FetchConfig::default());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_flag_rejected() {
        let cli = CliConfig::parse_from(["location-lite", "--timeout-ms", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_simulation_flags() {
        let cli = CliConfig::parse_from([
            "location-lite",
            "--gps-delay-ms",
            "300",
            "--disable-network",
            "--cached-age-ms",
            "90000",
        ]);

        assert_eq!(cli.gps_delay_ms, Some(300));
        assert_eq!(cli.network_delay_ms, None);
        assert!(cli.disable_network);
        assert_eq!(cli.cached_age_ms, Some(90_000));
    }

    #[test]
    fn test_logging_section_feeds_log_settings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"json\"\nverbose = true").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = CliConfig::parse_from(["location-lite", "--config", path]);
        assert_eq!(
            cli.log_settings().unwrap(),
            LogSettings {
                json: true,
                verbose: true
            }
        );

        let plain = CliConfig::parse_from(["location-lite", "--verbose"]);
        assert_eq!(
            plain.log_settings().unwrap(),
            LogSettings {
                json: false,
                verbose: true
            }
        );
    }
}
