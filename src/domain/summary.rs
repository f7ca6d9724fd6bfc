use std::cmp::Reverse;
use std::collections::HashMap;

use bigdecimal::BigDecimal;

use super::order::{Order, OrderStatus};
use super::ranking::AvailableRestaurant;

/// An order together with its computed full price.
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub order: Order,
    pub full_price: BigDecimal,
}

/// One row of the manager order view.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: i32,
    pub full_price: BigDecimal,
    pub client: String,
    pub phonenumber: String,
    pub address: String,
    pub status: OrderStatus,
    pub comments: String,
    pub payment_method: &'static str,
    pub restaurant: Option<String>,
    /// Present only for unhandled orders.
    pub available_restaurants: Option<Vec<AvailableRestaurant>>,
}

/// Build the manager view rows.
///
/// Rows are ordered by status column value descending (so `Unhandled`
/// comes first), then by id descending. `rank_order` is only invoked for
/// unhandled orders.
pub fn assemble<F>(
    orders: Vec<PricedOrder>,
    restaurant_names: &HashMap<i32, String>,
    mut rank_order: F,
) -> Vec<OrderSummary>
where
    F: FnMut(&Order) -> Vec<AvailableRestaurant>,
{
    let mut orders: Vec<PricedOrder> = orders
        .into_iter()
        .filter(|priced| priced.order.status != OrderStatus::Finished)
        .collect();
    orders.sort_by_key(|priced| {
        (
            Reverse(priced.order.status.as_str()),
            Reverse(priced.order.id),
        )
    });

    orders
        .into_iter()
        .map(|PricedOrder { order, full_price }| {
            let available_restaurants =
                (order.status == OrderStatus::Unhandled).then(|| rank_order(&order));
            OrderSummary {
                id: order.id,
                full_price,
                client: order.client_name(),
                restaurant: order
                    .restaurant_id
                    .and_then(|id| restaurant_names.get(&id).cloned()),
                status: order.status,
                payment_method: order.payment_method.label(),
                available_restaurants,
                phonenumber: order.phonenumber,
                address: order.address,
                comments: order.comments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::order::PaymentMethod;
    use crate::domain::ranking::Distance;

    fn priced(id: i32, status: OrderStatus, restaurant_id: Option<i32>) -> PricedOrder {
        PricedOrder {
            order: Order {
                id,
                firstname: "Anna".to_string(),
                lastname: "Smirnova".to_string(),
                phonenumber: "+79161234567".to_string(),
                address: "Red Square".to_string(),
                status,
                comments: "ring twice".to_string(),
                payment_method: PaymentMethod::Online,
                restaurant_id,
                created_at: Utc::now(),
                called_at: None,
                delivered_at: None,
            },
            full_price: BigDecimal::from(id * 10),
        }
    }

    fn nearby() -> Vec<AvailableRestaurant> {
        vec![AvailableRestaurant {
            restaurant_id: 1,
            name: "Star Burger".to_string(),
            distance: Distance::Km(1.5),
        }]
    }

    #[test]
    fn unhandled_orders_come_first_then_by_id_descending() {
        let orders = vec![
            priced(1, OrderStatus::Unhandled, None),
            priced(2, OrderStatus::Delivering, Some(1)),
            priced(3, OrderStatus::Preparing, Some(1)),
            priced(4, OrderStatus::Unhandled, None),
        ];

        let summaries = assemble(orders, &HashMap::new(), |_| Vec::new());

        let ids: Vec<i32> = summaries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![4, 1, 3, 2]);
    }

    #[test]
    fn only_unhandled_orders_get_available_restaurants() {
        let names = HashMap::from([(1, "Star Burger".to_string())]);
        let mut ranked = Vec::new();

        let summaries = assemble(
            vec![
                priced(1, OrderStatus::Unhandled, None),
                priced(2, OrderStatus::Preparing, Some(1)),
            ],
            &names,
            |order| {
                ranked.push(order.id);
                nearby()
            },
        );

        assert_eq!(ranked, vec![1]);
        assert_eq!(summaries[0].available_restaurants, Some(nearby()));
        assert!(summaries[1].available_restaurants.is_none());
        assert_eq!(summaries[1].restaurant.as_deref(), Some("Star Burger"));
    }

    #[test]
    fn summary_carries_presentation_fields() {
        let summaries = assemble(
            vec![priced(7, OrderStatus::Unhandled, None)],
            &HashMap::new(),
            |_| Vec::new(),
        );

        let summary = &summaries[0];
        assert_eq!(summary.client, "Anna Smirnova");
        assert_eq!(summary.full_price, BigDecimal::from(70));
        assert_eq!(summary.payment_method, "Online");
        assert_eq!(summary.status.label(), "Unhandled");
        assert_eq!(summary.comments, "ring twice");
        assert!(summary.restaurant.is_none());
    }

    #[test]
    fn finished_orders_are_dropped() {
        let summaries = assemble(
            vec![priced(1, OrderStatus::Finished, Some(1))],
            &HashMap::new(),
            |_| Vec::new(),
        );
        assert!(summaries.is_empty());
    }
}
