// Conversational policy
// The fixed rule set that turns retrieved catalog context into replies:
// inventory-constrained answering, price-range filtering, order-id
// assignment, tax, and the exact recommendation/invoice layouts.
//
// The rules are delivered to the LLM as instruction text, but the pieces
// that can be enforced deterministically (order counter, stock ceiling,
// tax arithmetic, price filtering, out-of-catalog refusal) live here as
// real code so correctness does not depend on the model honoring prose.

pub mod orders;
pub mod pricing;
pub mod products;
pub mod prompt;
pub mod render;

#[cfg(test)]
mod tests;

pub use orders::{
    LineItem, Order, OrderLedger, OrderRefusal, STOCK_CEILING, TAX_RATE, find_order_id,
};
pub use pricing::PriceRange;
pub use products::ProductRecord;
pub use prompt::{
    FALLBACK_REPLY, ORDER_ID_PLACEHOLDER, OUT_OF_CATALOG_REPLY, order_status_reply, system_prompt,
};
pub use render::{render_invoice, render_recommendation};
