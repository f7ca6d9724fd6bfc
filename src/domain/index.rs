//! Per-request lookup tables feeding the ranking engine.
//!
//! Both indexes are built once from a storage snapshot and are read-only
//! afterwards.

use std::collections::{BTreeSet, HashMap};

use super::catalog::{MenuItem, Restaurant};
use super::order::OrderLine;

static NO_PRODUCTS: BTreeSet<i32> = BTreeSet::new();

#[derive(Debug, Clone)]
pub struct RestaurantMenu {
    pub restaurant: Restaurant,
    pub available: BTreeSet<i32>,
}

/// Restaurant -> IDs of products it currently has in stock.
#[derive(Debug, Clone, Default)]
pub struct MenuAvailabilityIndex {
    menus: Vec<RestaurantMenu>,
}

impl MenuAvailabilityIndex {
    /// Every restaurant gets an entry, even when nothing on its menu is
    /// available. Menu rows pointing at unknown restaurants are skipped.
    pub fn build(restaurants: &[Restaurant], menu_items: &[MenuItem]) -> Self {
        let mut menus: Vec<RestaurantMenu> = restaurants
            .iter()
            .map(|restaurant| RestaurantMenu {
                restaurant: restaurant.clone(),
                available: BTreeSet::new(),
            })
            .collect();
        let position: HashMap<i32, usize> = restaurants
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id, idx))
            .collect();

        for item in menu_items.iter().filter(|item| item.availability) {
            match position.get(&item.restaurant_id) {
                Some(&idx) => {
                    menus[idx].available.insert(item.product_id);
                }
                None => log::debug!(
                    "menu item for unknown restaurant {} skipped",
                    item.restaurant_id
                ),
            }
        }

        Self { menus }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestaurantMenu> {
        self.menus.iter()
    }

    pub fn available(&self, restaurant_id: i32) -> Option<&BTreeSet<i32>> {
        self.menus
            .iter()
            .find(|menu| menu.restaurant.id == restaurant_id)
            .map(|menu| &menu.available)
    }

    pub fn len(&self) -> usize {
        self.menus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

/// Order -> IDs of the products it requires. Quantities are irrelevant here.
#[derive(Debug, Clone, Default)]
pub struct OrderLineIndex {
    required: HashMap<i32, BTreeSet<i32>>,
}

impl OrderLineIndex {
    pub fn build<'a>(lines: impl IntoIterator<Item = &'a OrderLine>) -> Self {
        let mut required: HashMap<i32, BTreeSet<i32>> = HashMap::new();
        for line in lines {
            required
                .entry(line.order_id)
                .or_default()
                .insert(line.product_id);
        }
        Self { required }
    }

    /// Products required by `order_id`; empty for orders without lines.
    pub fn required(&self, order_id: i32) -> &BTreeSet<i32> {
        self.required.get(&order_id).unwrap_or(&NO_PRODUCTS)
    }
}
