use std::sync::Arc;

use crate::application::catalog_service::CatalogService;
use crate::application::coordinate_resolver::CoordinateResolver;
use crate::application::order_service::OrderService;
use crate::config::ManagerCredentials;
use crate::domain::ports::{CatalogRepository, Geocoder, LocationCache, OrderRepository};

/// Shared, read-only application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderService,
    pub catalog: CatalogService,
    pub manager: ManagerCredentials,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        locations: Arc<dyn LocationCache>,
        geocoder: Arc<dyn Geocoder>,
        manager: ManagerCredentials,
    ) -> Self {
        let resolver = Arc::new(CoordinateResolver::new(locations, geocoder));
        Self {
            orders: OrderService::new(orders, catalog.clone(), resolver),
            catalog: CatalogService::new(catalog),
            manager,
        }
    }
}
