//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments take precedence over configuration files and `REGISTRY_*`
//! environment variables.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

/// Applies CLI overrides on top of file-based configuration.
#[derive(Debug)]
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the CLI asks for it.
    ///
    /// `--config` replaces the layered files with a single file; `--env`
    /// selects the environment overlay. Validation is deferred until the
    /// overrides are applied.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(path) = cli.config.as_deref() {
            Self::validate_config_file_access(path)?;
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::validation(
                "config_file".to_string(),
                format!("Configuration file does not exist: '{}'", path.display()),
            ));
        }

        std::fs::File::open(path).map(|_| ()).map_err(|e| {
            ConfigError::validation(
                "config_file".to_string(),
                format!("Cannot read configuration file '{}': {}", path.display(), e),
            )
        })
    }

    /// Returns the base configuration with CLI overrides applied, validated.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        if let Some(ref command) = cli.command {
            Self::apply_command_overrides(&mut config, command);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve {
                host,
                port,
                log_level,
                ..
            } => {
                if let Some(host) = host {
                    config.server.address = host.clone();
                }
                if let Some(port) = port {
                    config.server.port = *port;
                }
                // Command-level log level wins over --verbose/--quiet.
                if let Some(level) = log_level {
                    config.logger.level = level.as_str().to_string();
                }
            }
            Commands::Migrate { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::Cli;
    use crate::config::DatabaseConfig;
    use crate::config::loader::tests::{EnvGuard, env_lock};    use clap::Parser;
    use std::io::Write;

    fn valid_base_config() -> Settings {
        Settings {
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(valid_base_config()).merge_cli_args(&cli)
    }

    #[test]
    fn test_merger_keeps_base_config() {
        let merger = ConfigurationMerger::new(valid_base_config());
        assert_eq!(merger.config(), &valid_base_config());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["user-registry", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["user-registry", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_overrides_address_and_port() {
        let merged =
            merge(&["user-registry", "serve", "--host", "0.0.0.0", "--port", "9090"]).unwrap();

        assert_eq!(merged.server.address, "0.0.0.0");
        assert_eq!(merged.server.port, 9090);
        assert_eq!(merged.server.base_url(), "http://0.0.0.0:9090");
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged =
            merge(&["user-registry", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_merged_config_is_validated() {
        let cli = Cli::try_parse_from(["user-registry", "serve"]).unwrap();
        let result = ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli);

        // The default database URL is empty.
        assert!(result.is_err());
    }

    #[test]
    fn test_from_cli_loads_explicit_file() {
        let _lock = env_lock();
        let _env = EnvGuard::clean();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "allowed_age = 21\n[server]\nport = 7070\n[database]\nurl = \"postgres://localhost/cli\""
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = Cli::try_parse_from(["user-registry", "--config", path.as_str(), "serve"])
            .unwrap();

        let merged = ConfigurationMerger::from_cli(&cli)
            .unwrap()
            .merge_cli_args(&cli)
            .unwrap();

        assert_eq!(merged.allowed_age, 21);
        assert_eq!(merged.server.port, 7070);
        assert_eq!(merged.database.url, "postgres://localhost/cli");
    }
}
