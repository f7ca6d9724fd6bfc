pub mod catalog;
pub mod errors;
pub mod index;
pub mod location;
pub mod order;
pub mod ports;
pub mod ranking;
pub mod summary;
