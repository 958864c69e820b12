use std::collections::HashMap;
use std::sync::LazyLock;

use fancy_regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::policy::prompt::ORDER_ID_PLACEHOLDER;

static ORDER_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Order-No-\d+").expect("regex is valid"));

/// First real order id mentioned in a piece of text, e.g. `Order-No-3` in
/// "where is Order-No-3?". The pending marker is not a real id and never
/// matches.
#[inline]
pub fn find_order_id(text: &str) -> Option<String> {
    ORDER_ID_REGEX
        .find(text)
        .ok()
        .flatten()
        .map(|m| m.as_str().to_string())
}

/// Every product carries a fictional starting stock of 10 pieces; no single
/// line item may claim more than this many units of one product.
pub const STOCK_CEILING: u32 = 10;

/// Flat 5% tax applied to the exact order subtotal.
pub const TAX_RATE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    #[inline]
    pub fn new(product: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            product: product.into(),
            quantity,
            unit_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub line_items: Vec<LineItem>,
}

impl Order {
    /// Sum of quantity times unit price across all line items.
    #[inline]
    pub fn subtotal(&self) -> f64 {
        self.line_items
            .iter()
            .map(|item| f64::from(item.quantity) * item.unit_price)
            .sum()
    }

    /// Exactly 5% of the true subtotal; never rounded before applying the rate.
    #[inline]
    pub fn tax(&self) -> f64 {
        self.subtotal() * TAX_RATE
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.subtotal() + self.tax()
    }
}

/// Why an order was refused instead of placed. The display text is the fixed
/// message the customer sees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderRefusal {
    #[error("Currently we have only {STOCK_CEILING} pieces of {product}")]
    StockCeilingExceeded { product: String },

    #[error("Sorry, {product} is currently out of stock")]
    OutOfStock { product: String },

    #[error("Currently we have only {remaining} pieces of {product} left")]
    InsufficientStock { product: String, remaining: u32 },

    #[error("An order needs at least one line item")]
    EmptyOrder,
}

/// Per-session order state: the monotonically increasing order counter and
/// the running stock fiction. Lives inside a session, so ids restart at 1
/// for every new conversation and there is no cross-session uniqueness.
#[derive(Debug, Default)]
pub struct OrderLedger {
    next_order_number: u32,
    stock: HashMap<String, u32>,
    orders: Vec<Order>,
}

impl OrderLedger {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next order id: `Order-No-1`, `Order-No-2`, ... with no gaps
    /// and no reuse within this ledger's lifetime.
    #[inline]
    pub fn next_order_id(&mut self) -> String {
        self.next_order_number += 1;
        format!("Order-No-{}", self.next_order_number)
    }

    /// Validate and place an order. A line item asking for more than the
    /// 10-unit ceiling, or more than the product has left, refuses the whole
    /// order with the fixed message and mints no order id. The ceiling check
    /// applies per product per order, not across the order as a whole.
    #[inline]
    pub fn place_order(&mut self, line_items: Vec<LineItem>) -> Result<&Order, OrderRefusal> {
        if line_items.is_empty() {
            return Err(OrderRefusal::EmptyOrder);
        }

        for item in &line_items {
            if item.quantity > STOCK_CEILING {
                debug!(
                    "Refusing order: {} x{} exceeds the {}-unit ceiling",
                    item.product, item.quantity, STOCK_CEILING
                );
                return Err(OrderRefusal::StockCeilingExceeded {
                    product: item.product.clone(),
                });
            }

            let remaining = *self
                .stock
                .get(&item.product)
                .unwrap_or(&STOCK_CEILING);
            if remaining == 0 {
                return Err(OrderRefusal::OutOfStock {
                    product: item.product.clone(),
                });
            }
            if item.quantity > remaining {
                return Err(OrderRefusal::InsufficientStock {
                    product: item.product.clone(),
                    remaining,
                });
            }
        }

        for item in &line_items {
            let remaining = self
                .stock
                .entry(item.product.clone())
                .or_insert(STOCK_CEILING);
            *remaining -= item.quantity;
        }

        let order_id = self.next_order_id();
        info!("Placed {} with {} line items", order_id, line_items.len());

        self.orders.push(Order {
            order_id,
            line_items,
        });

        Ok(self.orders.last().expect("order was just pushed"))
    }

    /// Replace each occurrence of the pending-order-id marker in an LLM
    /// reply with its own freshly minted id, so a reply confirming two
    /// orders yields two distinct numbers. A reply without the marker mints
    /// nothing, so failed or orderless turns never burn a number.
    #[inline]
    pub fn fill_pending_order_id(&mut self, reply: &str) -> String {
        let mut filled = String::with_capacity(reply.len());
        let mut rest = reply;

        while let Some(position) = rest.find(ORDER_ID_PLACEHOLDER) {
            let order_id = self.next_order_id();
            debug!("Assigned {} to pending order in reply", order_id);
            filled.push_str(&rest[..position]);
            filled.push_str(&order_id);
            rest = &rest[position + ORDER_ID_PLACEHOLDER.len()..];
        }

        filled.push_str(rest);
        filled
    }

    /// Units left for a product under the conversational stock fiction.
    #[inline]
    pub fn remaining_stock(&self, product: &str) -> u32 {
        *self.stock.get(product).unwrap_or(&STOCK_CEILING)
    }

    #[inline]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Whether an order id was minted in this conversation, whether through
    /// `place_order` or by filling a pending marker in a reply.
    #[inline]
    pub fn knows_order(&self, order_id: &str) -> bool {
        order_id
            .strip_prefix("Order-No-")
            .and_then(|number| number.parse::<u32>().ok())
            .is_some_and(|number| number >= 1 && number <= self.next_order_number)
    }
}
