pub mod catalog;
pub mod manager;
pub mod orders;
