use std::collections::HashMap;

use diesel::prelude::*;
use diesel::PgConnection;

use crate::db::DbPool;
use crate::domain::catalog::{MenuItem, Product, ProductCategory, Restaurant};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;
use crate::schema::{product_categories, products, restaurant_menu_items, restaurants};

use super::models::{MenuItemRow, ProductCategoryRow, ProductRow, RestaurantRow};

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            address: row.address,
            contact_phone: row.contact_phone,
        }
    }
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            restaurant_id: row.restaurant_id,
            product_id: row.product_id,
            availability: row.availability,
        }
    }
}

impl From<ProductCategoryRow> for ProductCategory {
    fn from(row: ProductCategoryRow) -> Self {
        ProductCategory {
            id: row.id,
            name: row.name,
        }
    }
}

/// Resolve category rows for a batch of products in one extra query.
fn with_categories(
    conn: &mut PgConnection,
    rows: Vec<ProductRow>,
) -> Result<Vec<Product>, DomainError> {
    let category_ids: Vec<i32> = rows.iter().filter_map(|r| r.category_id).collect();
    let categories: HashMap<i32, ProductCategory> = product_categories::table
        .filter(product_categories::id.eq_any(&category_ids))
        .select(ProductCategoryRow::as_select())
        .load::<ProductCategoryRow>(conn)?
        .into_iter()
        .map(|row| (row.id, ProductCategory::from(row)))
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| Product {
            category: row.category_id.and_then(|id| categories.get(&id).cloned()),
            id: row.id,
            name: row.name,
            price: row.price,
            image: row.image,
            special_status: row.special_status,
            description: row.description,
        })
        .collect())
}

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn restaurants(&self) -> Result<Vec<Restaurant>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = restaurants::table
            .select(RestaurantRow::as_select())
            .order((restaurants::name.asc(), restaurants::id.asc()))
            .load::<RestaurantRow>(&mut conn)?;

        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    fn menu_items(&self) -> Result<Vec<MenuItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = restaurant_menu_items::table
            .select(MenuItemRow::as_select())
            .order(restaurant_menu_items::id.asc())
            .load::<MenuItemRow>(&mut conn)?;

        Ok(rows.into_iter().map(MenuItem::from).collect())
    }

    fn products(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load::<ProductRow>(&mut conn)?;

        with_categories(&mut conn, rows)
    }

    fn available_products(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let in_stock = restaurant_menu_items::table
            .filter(restaurant_menu_items::availability.eq(true))
            .select(restaurant_menu_items::product_id);
        let rows = products::table
            .filter(products::id.eq_any(in_stock))
            .select(ProductRow::as_select())
            .order(products::id.asc())
            .load::<ProductRow>(&mut conn)?;

        with_categories(&mut conn, rows)
    }

    fn find_products(&self, ids: &[i32]) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .filter(products::id.eq_any(ids))
            .select(ProductRow::as_select())
            .load::<ProductRow>(&mut conn)?;

        with_categories(&mut conn, rows)
    }
}
