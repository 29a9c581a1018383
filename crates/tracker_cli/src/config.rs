//! Command-line and environment configuration.

use clap::Parser;
use secrecy::SecretString;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracker_core::SmtpSettings;

/// Freelance tracker HTTP server.
#[derive(Debug, Parser)]
#[command(name = "freelance-tracker", version, about = "Freelance Tracker API server")]
pub struct Config {
    /// SQLite database file, created and migrated on first start.
    #[arg(long, env = "TRACKER_DB_PATH", default_value = "tracker.sqlite3")]
    pub db_path: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "TRACKER_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// trace|debug|info|warn|error. Defaults per build mode.
    #[arg(long, env = "TRACKER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, env = "TRACKER_LOG_DIR")]
    pub log_dir: Option<String>,

    #[arg(long, env = "SMTP_SERVER")]
    pub smtp_server: Option<String>,

    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// SMTP login password. Mail is only logged when unset.
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true, value_parser = parse_secret)]
    pub smtp_password: Option<SecretString>,

    /// Envelope sender. Defaults to the SMTP username.
    #[arg(long, env = "SENDER_EMAIL")]
    pub sender_email: Option<String>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(tracker_core::default_log_level())
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings::from_parts(
            self.smtp_server.clone(),
            self.smtp_port,
            self.smtp_username.clone(),
            self.smtp_password.clone(),
            self.sender_email.clone(),
        )
    }
}

fn parse_secret(raw: &str) -> Result<SecretString, Infallible> {
    Ok(SecretString::from(raw.to_string()))
}
