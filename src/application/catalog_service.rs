use std::sync::Arc;

use crate::domain::catalog::{availability_matrix, AvailabilityMatrix, Product, Restaurant};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn CatalogRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub fn available_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.available_products()
    }

    pub fn restaurants(&self) -> Result<Vec<Restaurant>, DomainError> {
        self.repo.restaurants()
    }

    pub fn availability_matrix(&self) -> Result<AvailabilityMatrix, DomainError> {
        let restaurants = self.repo.restaurants()?;
        let products = self.repo.products()?;
        let menu_items = self.repo.menu_items()?;
        Ok(availability_matrix(restaurants, products, &menu_items))
    }
}
