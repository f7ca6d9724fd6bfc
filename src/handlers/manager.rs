//! Manager console endpoints. Every view except login requires the manager
//! session cookie; requests without it are redirected to the login page.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use crate::domain::catalog::Restaurant;
use crate::domain::ranking::{AvailableRestaurant, Distance};
use crate::domain::summary::OrderSummary;
use crate::errors::{AppError, LOGIN_PATH};
use crate::state::AppState;

use super::catalog::ProductResponse;

pub const SESSION_COOKIE: &str = "manager_session";

/// Shown instead of a distance when either address could not be geocoded.
pub const UNKNOWN_DISTANCE: &str = "coordinates could not be determined";

/// Compares in time independent of where the first differing byte is.
fn same_secret(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn require_manager(req: &HttpRequest, state: &AppState) -> Result<(), AppError> {
    match req.cookie(SESSION_COOKIE) {
        Some(cookie) if same_secret(cookie.value(), &state.manager.session_token) => Ok(()),
        _ => Err(AppError::LoginRequired),
    }
}

// ── DTOs ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailableRestaurantResponse {
    pub restaurant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AvailableRestaurant> for AvailableRestaurantResponse {
    fn from(entry: AvailableRestaurant) -> Self {
        let (distance_km, error) = match entry.distance {
            Distance::Km(km) => (Some(km), None),
            Distance::Unknown => (None, Some(UNKNOWN_DISTANCE.to_string())),
        };
        Self {
            restaurant: entry.name,
            distance_km,
            error,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: i32,
    /// Decimal sum of line price × quantity, e.g. "620.50"
    pub full_price: String,
    pub client: String,
    pub phonenumber: String,
    pub address: String,
    pub status: String,
    pub comments: String,
    pub payment_method: String,
    pub restaurant: Option<String>,
    /// Only present for unhandled orders; nearest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_restaurants: Option<Vec<AvailableRestaurantResponse>>,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            id: summary.id,
            full_price: summary.full_price.to_string(),
            client: summary.client,
            phonenumber: summary.phonenumber,
            address: summary.address,
            status: summary.status.label().to_string(),
            comments: summary.comments,
            payment_method: summary.payment_method.to_string(),
            restaurant: summary.restaurant,
            available_restaurants: summary.available_restaurants.map(|entries| {
                entries
                    .into_iter()
                    .map(AvailableRestaurantResponse::from)
                    .collect()
            }),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            contact_phone: restaurant.contact_phone,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductAvailabilityResponse {
    pub product: ProductResponse,
    /// One flag per entry of `restaurants`, in the same order.
    pub availability: Vec<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityMatrixResponse {
    pub restaurants: Vec<RestaurantResponse>,
    pub products: Vec<ProductAvailabilityResponse>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /manager/login
#[utoipa::path(
    get,
    path = "/manager/login",
    responses((status = 200, description = "Login instructions")),
    tag = "manager"
)]
pub async fn login_page() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Manager login required",
        "login": format!("POST {LOGIN_PATH} with {{\"username\", \"password\"}}"),
    }))
}

/// POST /manager/login
///
/// On success sets the manager session cookie.
#[utoipa::path(
    post,
    path = "/manager/login",
    request_body = LoginRequest,
    responses(
        (status = 204, description = "Logged in; session cookie set"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "manager"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let manager = &state.manager;
    let valid = same_secret(&body.username, &manager.username)
        & same_secret(&body.password, &manager.password);
    if !valid {
        log::warn!("Rejected manager login for '{}'", body.username);
        return Err(AppError::Unauthorized);
    }

    let cookie = Cookie::build(SESSION_COOKIE, manager.session_token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    Ok(HttpResponse::NoContent().cookie(cookie).finish())
}

/// POST /manager/logout
#[utoipa::path(
    post,
    path = "/manager/logout",
    responses((status = 302, description = "Session cleared; redirect to login")),
    tag = "manager"
)]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    HttpResponse::Found()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .cookie(cookie)
        .finish()
}

/// GET /manager/orders
///
/// Open orders, unhandled ones first, each unhandled order annotated with
/// the restaurants able to cook it ranked by distance to the customer.
#[utoipa::path(
    get,
    path = "/manager/orders",
    responses(
        (status = 200, description = "Order summaries", body = Vec<OrderSummaryResponse>),
        (status = 302, description = "Not logged in; redirect to login"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "manager"
)]
pub async fn list_orders(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_manager(&req, &state)?;

    let summaries = web::block(move || state.orders.order_summaries())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderSummaryResponse> = summaries
        .into_iter()
        .map(OrderSummaryResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /manager/restaurants
#[utoipa::path(
    get,
    path = "/manager/restaurants",
    responses(
        (status = 200, description = "All restaurants", body = Vec<RestaurantResponse>),
        (status = 302, description = "Not logged in; redirect to login"),
    ),
    tag = "manager"
)]
pub async fn list_restaurants(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_manager(&req, &state)?;

    let restaurants = web::block(move || state.catalog.restaurants())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<RestaurantResponse> = restaurants
        .into_iter()
        .map(RestaurantResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /manager/products
///
/// Which restaurant has which product in stock.
#[utoipa::path(
    get,
    path = "/manager/products",
    responses(
        (status = 200, description = "Product availability per restaurant", body = AvailabilityMatrixResponse),
        (status = 302, description = "Not logged in; redirect to login"),
    ),
    tag = "manager"
)]
pub async fn product_availability(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_manager(&req, &state)?;

    let matrix = web::block(move || state.catalog.availability_matrix())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(AvailabilityMatrixResponse {
        restaurants: matrix
            .restaurants
            .into_iter()
            .map(RestaurantResponse::from)
            .collect(),
        products: matrix
            .products
            .into_iter()
            .map(|row| ProductAvailabilityResponse {
                product: ProductResponse::from(row.product),
                availability: row.availability,
            })
            .collect(),
    }))
}
