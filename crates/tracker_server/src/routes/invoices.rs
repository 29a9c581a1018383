use super::{success, with_service, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracker_core::{Invoice, NewInvoice};

pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewInvoice>, JsonRejection>,
) -> ApiResult<Invoice> {
    let Json(payload) = payload?;
    let invoice = with_service(&state, move |service| service.create_invoice(&payload)).await?;
    success("Invoice created successfully", invoice)
}

pub async fn list_invoices(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Invoice>> {
    let invoices = with_service(&state, |service| service.list_invoices()).await?;
    success("Invoices fetched successfully", invoices)
}
