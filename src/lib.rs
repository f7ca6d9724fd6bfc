pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;
pub mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};

use config::Config;
use domain::location::GeocodeError;
use errors::AppError;
use handlers::{catalog, manager, orders};
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::geocoder::YandexGeocoder;
use infrastructure::location_repo::DieselLocationCache;
use infrastructure::order_repo::DieselOrderRepository;
use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::register_order,
        catalog::product_list,
        catalog::banners_list,
        manager::list_orders,
        manager::list_restaurants,
        manager::product_availability,
        manager::login_page,
        manager::login,
        manager::logout,
    ),
    components(schemas(
        validation::OrderPayload,
        orders::PlacedOrderResponse,
        catalog::ProductResponse,
        catalog::CategoryResponse,
        catalog::BannerResponse,
        manager::LoginRequest,
        manager::OrderSummaryResponse,
        manager::AvailableRestaurantResponse,
        manager::RestaurantResponse,
        manager::AvailabilityMatrixResponse,
        manager::ProductAvailabilityResponse,
    )),
    tags(
        (name = "orders", description = "Customer order placement"),
        (name = "catalog", description = "Public product catalogue"),
        (name = "manager", description = "Manager console"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Wire the Postgres-backed repositories and the HTTP geocoder into the
/// application state.
///
/// The geocoder owns a blocking HTTP client, so this must be called outside
/// of any async runtime.
pub fn build_state(pool: DbPool, config: &Config) -> Result<AppState, GeocodeError> {
    let geocoder = YandexGeocoder::new(&config.geocoder)?;
    Ok(AppState::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselCatalogRepository::new(pool.clone())),
        Arc::new(DieselLocationCache::new(pool)),
        Arc::new(geocoder),
        config.manager.clone(),
    ))
}

/// Register the public API and the manager console routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(orders::payload_error))
            .route("/order", web::post().to(orders::register_order))
            .route("/products", web::get().to(catalog::product_list))
            .route("/banners", web::get().to(catalog::banners_list)),
    )
    .service(
        web::scope("/manager")
            .route("/login", web::get().to(manager::login_page))
            .route("/login", web::post().to(manager::login))
            .route("/logout", web::post().to(manager::logout))
            .route("/orders", web::get().to(manager::list_orders))
            .route("/restaurants", web::get().to(manager::list_restaurants))
            .route("/products", web::get().to(manager::product_availability)),
    )
    .default_service(web::to(unknown_route));
}

async fn unknown_route() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
