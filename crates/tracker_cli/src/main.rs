//! Freelance tracker server entry point.
//!
//! # Responsibility
//! - Load configuration, start logging, open the store.
//! - Run the HTTP server until Ctrl-C, then drain background work and close
//!   the store.

mod config;

use anyhow::Context;
use clap::Parser;
use config::Config;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracker_core::{
    Dispatcher, LogMailTransport, MailTransport, SmtpMailTransport, SmtpSettings, Store,
};
use tracker_server::AppState;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("freelance-tracker error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_logging(&config)?;

    let store = Store::open(&config.db_path)
        .with_context(|| format!("failed to open store at `{}`", config.db_path.display()))?;
    let store = Arc::new(store);
    store.ping().context("store did not answer ping")?;

    let smtp = config.smtp_settings();
    let mailer = mail_transport(&smtp)?;
    let dispatcher = Dispatcher::start();
    let state = AppState::new(Arc::clone(&store), dispatcher.handle(), mailer, smtp);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracker_server::serve(listener, Arc::new(state), shutdown_signal())
        .await
        .context("http server failed")?;

    dispatcher.shutdown().await;
    match Arc::try_unwrap(store) {
        Ok(store) => store.close().context("failed to close store")?,
        Err(_) => warn!("event=db_close module=cli status=skipped reason=store_still_shared"),
    }
    info!("event=app_stop module=cli status=ok");
    Ok(())
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    match config.log_dir.as_deref() {
        Some(dir) => tracker_core::init_logging(config.log_level(), dir)?,
        None => tracker_core::init_stderr_logging(config.log_level())?,
    }
    Ok(())
}

fn mail_transport(smtp: &SmtpSettings) -> anyhow::Result<Arc<dyn MailTransport>> {
    if !smtp.has_credentials() {
        warn!("event=mail_transport module=cli status=skipped reason=no_smtp_password fallback=log");
        return Ok(Arc::new(LogMailTransport::new(smtp)));
    }
    let transport = SmtpMailTransport::new(smtp)
        .with_context(|| format!("failed to configure SMTP relay {}", smtp.endpoint()))?;
    Ok(Arc::new(transport))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=cli status=error error={err}");
        std::future::pending::<()>().await;
    }
    info!("event=shutdown_signal module=cli status=ok");
}
