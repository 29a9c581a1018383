//! Shared handler state.

use std::sync::Arc;
use tracker_core::{DispatcherHandle, MailTransport, SmtpSettings, Store};

/// Everything a handler may touch. Built once at startup.
pub struct AppState {
    pub store: Arc<Store>,
    pub dispatcher: DispatcherHandle,
    pub mailer: Arc<dyn MailTransport>,
    pub smtp: SmtpSettings,
}

impl AppState {
    pub fn new(
        store: Arc<Store>,
        dispatcher: DispatcherHandle,
        mailer: Arc<dyn MailTransport>,
        smtp: SmtpSettings,
    ) -> Self {
        Self {
            store,
            dispatcher,
            mailer,
            smtp,
        }
    }
}
