use super::catalog::{MenuItem, Product, Restaurant};
use super::errors::DomainError;
use super::location::{Coordinates, GeocodeError};
use super::order::{Order, OrderDraft, OrderLine};

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the order and all of its lines atomically. Line prices are
    /// copied from the products' current prices. Fails with a `products`
    /// validation error, persisting nothing, when any product is unknown.
    fn create(&self, draft: &OrderDraft) -> Result<Order, DomainError>;
    /// Every order that is not yet finished.
    fn list_active(&self) -> Result<Vec<Order>, DomainError>;
    fn lines_for(&self, order_ids: &[i32]) -> Result<Vec<OrderLine>, DomainError>;
}

pub trait CatalogRepository: Send + Sync + 'static {
    /// All restaurants, ordered by name.
    fn restaurants(&self) -> Result<Vec<Restaurant>, DomainError>;
    fn menu_items(&self) -> Result<Vec<MenuItem>, DomainError>;
    fn products(&self) -> Result<Vec<Product>, DomainError>;
    /// Products offered by at least one restaurant.
    fn available_products(&self) -> Result<Vec<Product>, DomainError>;
    fn find_products(&self, ids: &[i32]) -> Result<Vec<Product>, DomainError>;
}

/// Address-keyed coordinate store. Rows are append-only.
pub trait LocationCache: Send + Sync + 'static {
    fn find(&self, address: &str) -> Result<Option<Coordinates>, DomainError>;
    /// Store `coordinates` unless a row for `address` already exists, and
    /// return whichever row is stored afterwards.
    fn insert_if_absent(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<Coordinates, DomainError>;
}

pub trait Geocoder: Send + Sync + 'static {
    /// Most relevant candidate for `address`, or `None` when the provider
    /// found nothing.
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Maps an address to coordinates. `None` means the address could not be
/// resolved; implementations never fail otherwise.
pub trait ResolveCoordinates {
    fn resolve(&self, address: &str) -> Option<Coordinates>;
}
