//! Core domain logic for the freelance tracker.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod dispatch;
pub mod logging;
pub mod mail;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult, Store};
pub use dispatch::{
    DispatchError, Dispatcher, DispatcherHandle, DispatcherStats, JobId, JobState, UnitOfWork,
    WorkError, WorkResult,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget, LoggingError,
};
pub use mail::{
    EmailMessage, EmailRequest, LogMailTransport, MailTransport, SendEmailUnit, SmtpMailTransport,
    SmtpSecurity, SmtpSettings, TransportError,
};
pub use model::client::{Client, ClientId, NewClient};
pub use model::invoice::{Invoice, InvoiceId, NewInvoice};
pub use model::project::{NewProject, Project, ProjectId, ProjectWithClientName};
pub use model::task::{NewTask, Task, TaskId};
pub use model::{ValidationError, ValidationResult};
pub use notify::{write_notification, NotificationUnit};
pub use repo::{ConstraintKind, EntityKind, RepoError, RepoResult};
pub use service::tracker_service::{SqliteTrackerService, TrackerService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
