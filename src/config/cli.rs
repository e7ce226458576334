//! Command-line flags.
//!
//! Flags are the highest-priority configuration source: anything given here
//! overrides YAML files and environment variables.

use clap::{ArgAction, Parser};

use super::{Config, ConfigError};

/// coffee-report: sales and employee-account report service.
#[derive(Parser, Debug, Default)]
#[command(name = "coffee-report", version)]
pub struct CliArgs {
    /// Verbose logging.
    #[arg(long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Address to listen on (e.g. :5000).
    #[arg(long)]
    pub addr: Option<String>,

    /// Connection string for the MongoDB server.
    #[arg(long)]
    pub mongo: Option<String>,

    /// Enable TLS.
    #[arg(long, action = ArgAction::SetTrue)]
    pub tls: bool,

    /// Certificate file (e.g. cert.pem).
    #[arg(long)]
    pub cert: Option<String>,

    /// Certificate private key file (e.g. key.pem).
    #[arg(long = "certkey")]
    pub cert_key: Option<String>,

    /// YAML configuration file.
    #[arg(long)]
    pub config: Option<String>,
}

impl CliArgs {
    /// Load configuration from all sources and apply these flags on top.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Override `config` with every flag that was given.
    pub fn apply(&self, config: &mut Config) {
        if self.verbose {
            config.server.verbose = true;
        }
        if let Some(addr) = &self.addr {
            config.server.addr = addr.clone();
        }
        if let Some(uri) = &self.mongo {
            config.storage.mongodb.uri = uri.clone();
        }
        if self.tls {
            config.server.tls.enabled = true;
        }
        if let Some(cert) = &self.cert {
            config.server.tls.cert = cert.clone();
        }
        if let Some(key) = &self.cert_key {
            config.server.tls.key = key.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::try_parse_from([
            "coffee-report",
            "--verbose",
            "--addr",
            ":8080",
            "--mongo",
            "mongodb://db:27017",
            "--tls",
            "--cert",
            "cert.pem",
            "--certkey",
            "key.pem",
        ])
        .unwrap();

        let mut config = Config::default();
        args.apply(&mut config);

        assert!(config.server.verbose);
        assert_eq!(config.server.addr, ":8080");
        assert_eq!(config.storage.mongodb.uri, "mongodb://db:27017");
        assert!(config.server.tls.enabled);
        assert_eq!(config.server.tls.cert, "cert.pem");
        assert_eq!(config.server.tls.key, "key.pem");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = CliArgs::try_parse_from(["coffee-report"]).unwrap();

        let mut config = Config::default();
        config.storage.mongodb.uri = "mongodb://from-file:27017".to_string();
        args.apply(&mut config);

        assert!(!config.server.verbose);
        assert_eq!(config.server.addr, ":5000");
        assert_eq!(config.storage.mongodb.uri, "mongodb://from-file:27017");
        assert!(!config.server.tls.enabled);
    }

    #[test]
    fn test_empty_mongo_flag_disables_store() {
        let args = CliArgs::try_parse_from(["coffee-report", "--mongo", ""]).unwrap();

        let mut config = Config::default();
        args.apply(&mut config);

        assert!(config.storage.mongodb.uri.is_empty());
    }
}
