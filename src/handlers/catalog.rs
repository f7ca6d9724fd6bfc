use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::{Product, ProductCategory};
use crate::errors::AppError;
use crate::state::AppState;

/// Public prefix under which product images are served.
pub const MEDIA_URL: &str = "/media/";

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
}

impl From<ProductCategory> for CategoryResponse {
    fn from(category: ProductCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    /// Decimal price as a string, e.g. "350.00"
    pub price: String,
    pub special_status: bool,
    pub description: String,
    pub category: Option<CategoryResponse>,
    pub image: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price.to_string(),
            special_status: product.special_status,
            description: product.description,
            category: product.category.map(CategoryResponse::from),
            image: format!("{MEDIA_URL}{}", product.image),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BannerResponse {
    pub title: String,
    pub src: String,
    pub text: String,
}

/// GET /api/products
///
/// Products that at least one restaurant currently has in stock.
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Available products", body = Vec<ProductResponse>),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn product_list(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = web::block(move || state.catalog.available_products())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/banners
#[utoipa::path(
    get,
    path = "/api/banners",
    responses(
        (status = 200, description = "Promotional banners", body = Vec<BannerResponse>),
    ),
    tag = "catalog"
)]
pub async fn banners_list() -> HttpResponse {
    let banner = |title: &str, image: &str, text: &str| BannerResponse {
        title: title.to_string(),
        src: format!("/static/{image}"),
        text: text.to_string(),
    };
    HttpResponse::Ok().json(vec![
        banner("Burger", "burger.jpg", "Tasty Burger at your door step"),
        banner("Spices", "food.jpg", "All Cuisines"),
        banner(
            "New York",
            "tasty.jpg",
            "Food is incomplete without a tasty dessert",
        ),
    ])
}
