pub mod catalog_repo;
pub mod geocoder;
pub mod location_repo;
pub mod models;
pub mod order_repo;
