use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::errors::AppError;
use crate::state::AppState;
use crate::validation::OrderPayload;

// ── Response DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct PlacedOrderResponse {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    /// Normalized to E.164.
    pub phonenumber: String,
    pub address: String,
}

impl From<Order> for PlacedOrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            firstname: order.firstname,
            lastname: order.lastname,
            phonenumber: order.phonenumber,
            address: order.address,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/order
///
/// Registers an order and its lines in a single transaction. Line prices are
/// copied from the current product prices. The delivery address is geocoded
/// after the commit; failures there never affect the response.
#[utoipa::path(
    post,
    path = "/api/order",
    request_body = OrderPayload,
    responses(
        (status = 201, description = "Order registered", body = PlacedOrderResponse),
        (status = 422, description = "Field-level validation errors"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn register_order(
    state: web::Data<AppState>,
    body: web::Json<OrderPayload>,
) -> Result<HttpResponse, AppError> {
    let draft = body.validate().map_err(AppError::Validation)?;

    let order = web::block(move || state.orders.place_order(draft))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PlacedOrderResponse::from(order)))
}

/// Body rejections from the JSON extractor, reported like any other
/// payload violation: `422` with a `non_field_errors` entry.
pub fn payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match err {
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            "Invalid data. Expected a dictionary.".to_string()
        }
        JsonPayloadError::Deserialize(e) => format!("JSON parse error - {e}"),
        other => return other.into(),
    };
    AppError::from(DomainError::field("non_field_errors", message)).into()
}
