//! Router assembly and the serve loop.

use crate::routes::{background, clients, email, health, invoices, projects, tasks};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/clients/create", post(clients::create_client))
        .route("/clients/list", get(clients::list_clients))
        .route("/clients/view/{id}", get(clients::view_client))
        .route("/clients/{id}/projects", get(clients::client_projects))
        .route("/projects/create", post(projects::create_project))
        .route("/projects/list", get(projects::list_projects))
        .route("/projects/overview", get(projects::projects_overview))
        .route("/projects/{id}/tasks", get(projects::project_tasks))
        .route("/projects/{id}/invoices", get(projects::project_invoices))
        .route("/tasks/create", post(tasks::create_task))
        .route("/tasks/list", get(tasks::list_tasks))
        .route("/invoices/create", post(invoices::create_invoice))
        .route("/invoices/list", get(invoices::list_invoices))
        .route(
            "/background/send-notification/{email}",
            post(background::send_notification),
        )
        .route("/email/send", post(email::send_email))
        .route("/email/health", get(email::email_health))
        .with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("event=server_start module=server status=ok addr={addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("event=server_stop module=server status=ok addr={addr}");
    Ok(())
}
