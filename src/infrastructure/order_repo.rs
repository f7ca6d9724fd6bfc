use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderDraft, OrderLine, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, orders, products};

use super::models::{NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Row conversions ───────────────────────────────────────────────────────────

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            status: row.status.parse()?,
            payment_method: row.payment_method.parse()?,
            firstname: row.firstname,
            lastname: row.lastname,
            phonenumber: row.phonenumber,
            address: row.address,
            comments: row.comments,
            restaurant_id: row.restaurant_id,
            created_at: row.created_at,
            called_at: row.called_at,
            delivered_at: row.delivered_at,
        })
    }
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        OrderLine {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, draft: &OrderDraft) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Snapshot the current price of every ordered product
            let product_ids: Vec<i32> = draft.items.iter().map(|i| i.product_id).collect();
            let prices: HashMap<i32, BigDecimal> = products::table
                .filter(products::id.eq_any(&product_ids))
                .select((products::id, products::price))
                .load::<(i32, BigDecimal)>(conn)?
                .into_iter()
                .collect();

            // 2. Insert the order
            let order: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    firstname: &draft.firstname,
                    lastname: &draft.lastname,
                    phonenumber: &draft.phonenumber,
                    address: &draft.address,
                    status: OrderStatus::Unhandled.as_str(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 3. Insert order lines; an unknown product rolls everything back
            let new_lines = draft
                .items
                .iter()
                .map(|item| {
                    let price = prices
                        .get(&item.product_id)
                        .cloned()
                        .ok_or_else(|| DomainError::unknown_product(item.product_id))?;
                    Ok(NewOrderLineRow {
                        order_id: order.id,
                        product_id: item.product_id,
                        quantity: item.quantity,
                        price,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            Order::try_from(order)
        })
    }

    fn list_active(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .filter(orders::status.ne(OrderStatus::Finished.as_str()))
            .select(OrderRow::as_select())
            .order(orders::id.desc())
            .load::<OrderRow>(&mut conn)?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    fn lines_for(&self, order_ids: &[i32]) -> Result<Vec<OrderLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = order_lines::table
            .filter(order_lines::order_id.eq_any(order_ids))
            .select(OrderLineRow::as_select())
            .order(order_lines::id.asc())
            .load::<OrderLineRow>(&mut conn)?;

        Ok(rows.into_iter().map(OrderLine::from).collect())
    }
}
