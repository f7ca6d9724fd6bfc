use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;

/// Order lifecycle. Orders only ever move forward through these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Unhandled,
    Preparing,
    Delivering,
    Finished,
}

impl OrderStatus {
    /// Value persisted in the `orders.status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unhandled => "Unhandled",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Delivering => "Delivering",
            OrderStatus::Finished => "Finished",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Unhandled => "Unhandled",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Delivering => "Out for delivery",
            OrderStatus::Finished => "Finished",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unhandled" => Ok(OrderStatus::Unhandled),
            "Preparing" => Ok(OrderStatus::Preparing),
            "Delivering" => Ok(OrderStatus::Delivering),
            "Finished" => Ok(OrderStatus::Finished),
            other => Err(DomainError::Internal(format!("unknown order status '{other}'"))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Online,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "Online",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(PaymentMethod::Online),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(DomainError::Internal(format!(
                "unknown payment method '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub status: OrderStatus,
    pub comments: String,
    pub payment_method: PaymentMethod,
    pub restaurant_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn client_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// A persisted order line. `price` is the product price captured when the
/// order was placed and never changes afterwards.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemInput {
    pub product_id: i32,
    pub quantity: i32,
}

/// A validated order waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub items: Vec<OrderItemInput>,
}

/// Sum of `price * quantity` over the given lines.
pub fn full_price<'a>(lines: impl IntoIterator<Item = &'a OrderLine>) -> BigDecimal {
    lines
        .into_iter()
        .map(|line| line.price.clone() * BigDecimal::from(line.quantity))
        .sum()
}
