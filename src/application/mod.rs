pub mod catalog_service;
pub mod coordinate_resolver;
pub mod order_service;
