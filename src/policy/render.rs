//! Deterministic renderers for the fixed recommendation and invoice layouts.

use itertools::Itertools;

use crate::policy::orders::Order;
use crate::policy::products::{ProductRecord, currency_glyph};

const DIVIDER_WIDTH: usize = 41;
const ITEM_COLUMN_WIDTH: usize = 25;
const QTY_COLUMN_WIDTH: usize = 7;
const LABEL_COLUMN_WIDTH: usize = 16;

fn divider() -> String {
    "─".repeat(DIVIDER_WIDTH)
}

/// Render one product in the fixed field-aligned recommendation block.
/// Absent fields render as "not available" rather than invented values.
#[inline]
pub fn render_recommendation(product: &ProductRecord) -> String {
    let mrp = product.mrp_display.as_deref().unwrap_or("not available");
    let offer = product.offer.as_deref().unwrap_or("not available");
    let width = LABEL_COLUMN_WIDTH;

    [
        format!("{:<width$}{}", "Brand name :", product.brand),
        format!("{:<width$}{}", "Product name:", product.name),
        format!("{:<width$}{}", "Price:", product.price_display),
        format!("{:<width$}{}", "MRP:", mrp),
        format!("{:<width$}{}", "Offer:", offer),
    ]
    .into_iter()
    .join("\n")
}

/// Render an order as the fixed Item/Qty/Price invoice table. The currency
/// glyph comes from the catalog's own price strings; amounts always carry
/// two decimals and tax is exactly 5% of the true subtotal.
#[inline]
pub fn render_invoice(order: &Order, price_display_sample: &str) -> String {
    let glyph = currency_glyph(price_display_sample);
    let item_width = ITEM_COLUMN_WIDTH;
    let qty_width = QTY_COLUMN_WIDTH;
    let mut lines = vec![
        "Order Invoice".to_string(),
        divider(),
        format!("{:<item_width$}{:<qty_width$}{}", "Item", "Qty", "Price"),
        divider(),
    ];

    for item in &order.line_items {
        let name = truncate(&item.product, ITEM_COLUMN_WIDTH - 1);
        let qty = format!("x{}", item.quantity);
        let line_total = f64::from(item.quantity) * item.unit_price;
        lines.push(format!(
            "{name:<item_width$}{qty:<qty_width$}{glyph}{line_total:.2}"
        ));
    }

    let amount_width = ITEM_COLUMN_WIDTH + QTY_COLUMN_WIDTH;
    lines.push(divider());
    lines.push(format!("{:<amount_width$}{glyph}{:.2}", "Subtotal:", order.subtotal()));
    lines.push(format!("{:<amount_width$}{glyph}{:.2}", "Tax (5%):", order.tax()));
    lines.push(divider());
    lines.push(format!("{:<amount_width$}{glyph}{:.2}", "Total:", order.total()));
    lines.push(String::new());
    lines.push(format!("Order ID: {}", order.order_id));

    lines.join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
