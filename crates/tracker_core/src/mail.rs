//! Outbound email settings, messages, and the transport seam.
//!
//! # Responsibility
//! - Hold SMTP settings loaded at process start.
//! - Build outbound messages from validated requests.
//! - Hand messages to a [`MailTransport`] from a background unit of work.
//! - Deliver over SMTP with implicit TLS on port 465 and STARTTLS elsewhere.
//!
//! # Invariants
//! - The SMTP password is never logged or serialized.
//! - Message bodies and subjects are never logged; recipients are.

use crate::dispatch::{UnitOfWork, WorkResult};
use crate::model::{validate_email, ValidationResult};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SMTP_SERVER: &str = "smtp.zoho.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_SMTP_USERNAME: &str = "you@yourdomain.com";
pub const DEFAULT_SUBJECT: &str = "Hello";
pub const DEFAULT_BODY: &str = "Test";

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection security implied by the configured port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Implicit TLS (port 465).
    Tls,
    /// Plain connection upgraded with STARTTLS.
    StartTls,
}

/// SMTP account settings.
#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// Envelope sender. Defaults to `username`.
    pub sender: String,
}

impl SmtpSettings {
    /// Builds settings from optional overrides, falling back to the defaults.
    pub fn from_parts(
        server: Option<String>,
        port: Option<u16>,
        username: Option<String>,
        password: Option<SecretString>,
        sender: Option<String>,
    ) -> Self {
        let username = username.unwrap_or_else(|| DEFAULT_SMTP_USERNAME.to_string());
        let sender = sender.unwrap_or_else(|| username.clone());
        Self {
            server: server.unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
            port: port.unwrap_or(DEFAULT_SMTP_PORT),
            username,
            password: password.unwrap_or_else(|| SecretString::from(String::new())),
            sender,
        }
    }

    /// `server:port`, as reported to API callers.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Whether a password was configured for SMTP login.
    pub fn has_credentials(&self) -> bool {
        !self.password.expose_secret().is_empty()
    }

    pub fn security(&self) -> SmtpSecurity {
        if self.port == DEFAULT_SMTP_PORT {
            SmtpSecurity::Tls
        } else {
            SmtpSecurity::StartTls
        }
    }
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self::from_parts(None, None, None, None, None)
    }
}

impl Debug for SmtpSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("sender", &self.sender)
            .finish()
    }
}

/// Caller-supplied email request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailRequest {
    pub receiver: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_body")]
    pub body: String,
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn default_body() -> String {
    DEFAULT_BODY.to_string()
}

impl EmailRequest {
    pub fn new(receiver: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            subject: default_subject(),
            body: default_body(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_email("receiver", &self.receiver)
    }
}

/// Fully addressed outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(settings: &SmtpSettings, request: &EmailRequest) -> Self {
        Self {
            from: settings.sender.clone(),
            to: request.receiver.trim().to_string(),
            subject: request.subject.clone(),
            body: request.body.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("mail server rejected credentials")]
    Authentication,
    #[error("mail server unreachable: {0}")]
    Connection(String),
    #[error("mail server rejected message: {0}")]
    Rejected(String),
}

/// Delivery seam for outbound mail.
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), TransportError>;
}

/// Transport that records each delivery in the log instead of sending it.
#[derive(Debug, Clone)]
pub struct LogMailTransport {
    endpoint: String,
}

impl LogMailTransport {
    pub fn new(settings: &SmtpSettings) -> Self {
        Self {
            endpoint: settings.endpoint(),
        }
    }
}

impl MailTransport for LogMailTransport {
    fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        info!(
            "event=mail_send module=mail status=ok via={} to={} body_chars={}",
            self.endpoint,
            message.to,
            message.body.chars().count()
        );
        Ok(())
    }
}

/// SMTP delivery through an authenticated relay.
pub struct SmtpMailTransport {
    mailer: SmtpTransport,
    endpoint: String,
}

impl SmtpMailTransport {
    /// Configures the relay. No connection is made until the first send.
    pub fn new(settings: &SmtpSettings) -> Result<Self, TransportError> {
        let security = settings.security();
        let builder = match security {
            SmtpSecurity::Tls => SmtpTransport::relay(&settings.server),
            SmtpSecurity::StartTls => SmtpTransport::starttls_relay(&settings.server),
        }
        .map_err(|err| TransportError::Connection(err.to_string()))?;

        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().to_string(),
        );
        let mailer = builder
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        let endpoint = settings.endpoint();
        info!("event=mail_transport module=mail status=ok via={endpoint} security={security:?}");
        Ok(Self { mailer, endpoint })
    }
}

impl MailTransport for SmtpMailTransport {
    fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        let email = build_message(message)?;
        self.mailer.send(&email).map_err(classify_smtp_error)?;
        info!(
            "event=mail_send module=mail status=ok via={} to={}",
            self.endpoint, message.to
        );
        Ok(())
    }
}

fn build_message(message: &EmailMessage) -> Result<Message, TransportError> {
    let from = message
        .from
        .parse::<Mailbox>()
        .map_err(|err| TransportError::Rejected(format!("sender `{}`: {err}", message.from)))?;
    let to = message
        .to
        .parse::<Mailbox>()
        .map_err(|err| TransportError::Rejected(format!("receiver `{}`: {err}", message.to)))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|err| TransportError::Rejected(err.to_string()))
}

// 53x replies are login failures; other permanent replies reject the message.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> TransportError {
    let code = err.status().map(|code| code.to_string());
    match code.as_deref() {
        Some(code) if code.starts_with("53") => TransportError::Authentication,
        _ if err.is_permanent() => TransportError::Rejected(err.to_string()),
        _ => TransportError::Connection(err.to_string()),
    }
}

/// Background unit delivering one message.
pub struct SendEmailUnit {
    transport: Arc<dyn MailTransport>,
    message: EmailMessage,
}

impl SendEmailUnit {
    pub fn new(transport: Arc<dyn MailTransport>, message: EmailMessage) -> Self {
        Self { transport, message }
    }
}

impl UnitOfWork for SendEmailUnit {
    fn name(&self) -> &'static str {
        "send_email"
    }

    fn run(self: Box<Self>) -> WorkResult {
        self.transport.send(&self.message)?;
        Ok(())
    }
}
