//! Recipient notification unit.

use crate::dispatch::{UnitOfWork, WorkResult};
use log::{debug, info};

pub const DEFAULT_NOTIFICATION_MESSAGE: &str = "some notification";

/// Number of preparation passes made per notification.
pub const PREPARATION_PASSES: usize = 3;

/// Prepares a notification for `email` and records it in the log.
///
/// Returns the number of preparation passes made.
pub fn write_notification(email: &str, message: &str) -> usize {
    for pass in 0..PREPARATION_PASSES {
        debug!("event=notification_prepare module=notify status=ok pass={pass} to={email}");
    }
    info!(
        "event=notification_write module=notify status=ok to={email} message_chars={}",
        message.chars().count()
    );
    PREPARATION_PASSES
}

/// Background unit wrapping [`write_notification`].
pub struct NotificationUnit {
    email: String,
    message: String,
}

impl NotificationUnit {
    pub fn new(email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            message: message.into(),
        }
    }
}

impl UnitOfWork for NotificationUnit {
    fn name(&self) -> &'static str {
        "write_notification"
    }

    fn run(self: Box<Self>) -> WorkResult {
        write_notification(&self.email, &self.message);
        Ok(())
    }
}
