use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::index::{MenuAvailabilityIndex, OrderLineIndex};
use crate::domain::order::{full_price, Order, OrderDraft, OrderLine, OrderStatus};
use crate::domain::ports::{CatalogRepository, OrderRepository, ResolveCoordinates};
use crate::domain::ranking::rank;
use crate::domain::summary::{assemble, OrderSummary, PricedOrder};

use super::coordinate_resolver::MemoizedResolver;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    catalog: Arc<dyn CatalogRepository>,
    resolver: Arc<dyn ResolveCoordinates + Send + Sync>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        catalog: Arc<dyn CatalogRepository>,
        resolver: Arc<dyn ResolveCoordinates + Send + Sync>,
    ) -> Self {
        Self {
            orders,
            catalog,
            resolver,
        }
    }

    /// Persist a validated order, then warm the coordinate cache for its
    /// delivery address. Geocoding failures never fail the placement.
    pub fn place_order(&self, draft: OrderDraft) -> Result<Order, DomainError> {
        let requested: Vec<i32> = draft.items.iter().map(|item| item.product_id).collect();
        let known: HashSet<i32> = self
            .catalog
            .find_products(&requested)?
            .into_iter()
            .map(|product| product.id)
            .collect();
        if let Some(missing) = requested.iter().find(|id| !known.contains(id)) {
            return Err(DomainError::unknown_product(*missing));
        }

        let order = self.orders.create(&draft)?;
        log::info!("Order {} registered with {} line(s)", order.id, draft.items.len());

        if self.resolver.resolve(&order.address).is_none() {
            log::warn!(
                "Order {}: delivery address '{}' could not be geocoded",
                order.id,
                order.address
            );
        }
        Ok(order)
    }

    /// Manager view: every open order with its price, and for unhandled
    /// orders the restaurants able to cook them, nearest first.
    pub fn order_summaries(&self) -> Result<Vec<OrderSummary>, DomainError> {
        let orders = self.orders.list_active()?;
        let ids: Vec<i32> = orders.iter().map(|order| order.id).collect();
        let lines = self.orders.lines_for(&ids)?;

        let restaurants = self.catalog.restaurants()?;
        let menu_items = self.catalog.menu_items()?;
        let availability = MenuAvailabilityIndex::build(&restaurants, &menu_items);

        let unhandled: HashSet<i32> = orders
            .iter()
            .filter(|order| order.status == OrderStatus::Unhandled)
            .map(|order| order.id)
            .collect();
        let required = OrderLineIndex::build(
            lines
                .iter()
                .filter(|line| unhandled.contains(&line.order_id)),
        );

        let mut lines_by_order: HashMap<i32, Vec<&OrderLine>> = HashMap::new();
        for line in &lines {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }
        let priced: Vec<PricedOrder> = orders
            .into_iter()
            .map(|order| {
                let price = full_price(
                    lines_by_order
                        .get(&order.id)
                        .into_iter()
                        .flatten()
                        .copied(),
                );
                PricedOrder {
                    order,
                    full_price: price,
                }
            })
            .collect();

        let names: HashMap<i32, String> = restaurants
            .into_iter()
            .map(|restaurant| (restaurant.id, restaurant.name))
            .collect();

        let resolver = MemoizedResolver::new(self.resolver.as_ref());
        Ok(assemble(priced, &names, |order| {
            rank(order, &availability, &required, &resolver)
        }))
    }
}
