use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCategory {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: Option<ProductCategory>,
    pub price: BigDecimal,
    pub image: String,
    pub special_status: bool,
    pub description: String,
}

/// Coordinates are not stored on the restaurant; they are resolved from
/// `address` on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub restaurant_id: i32,
    pub product_id: i32,
    pub availability: bool,
}

#[derive(Debug, Clone)]
pub struct ProductAvailability {
    pub product: Product,
    /// One flag per restaurant, in the same order as
    /// [`AvailabilityMatrix::restaurants`].
    pub availability: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct AvailabilityMatrix {
    pub restaurants: Vec<Restaurant>,
    pub products: Vec<ProductAvailability>,
}

/// Cross every product with every restaurant. A restaurant without a menu
/// row for a product counts as not selling it.
pub fn availability_matrix(
    restaurants: Vec<Restaurant>,
    products: Vec<Product>,
    menu_items: &[MenuItem],
) -> AvailabilityMatrix {
    let mut by_product: HashMap<i32, HashSet<i32>> = HashMap::new();
    for item in menu_items.iter().filter(|item| item.availability) {
        by_product
            .entry(item.product_id)
            .or_default()
            .insert(item.restaurant_id);
    }

    let products = products
        .into_iter()
        .map(|product| {
            let selling = by_product.get(&product.id);
            let availability = restaurants
                .iter()
                .map(|r| selling.is_some_and(|ids| ids.contains(&r.id)))
                .collect();
            ProductAvailability {
                product,
                availability,
            }
        })
        .collect();

    AvailabilityMatrix {
        restaurants,
        products,
    }
}
