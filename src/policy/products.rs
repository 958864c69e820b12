use std::collections::BTreeMap;

use tracing::debug;

/// One catalog product, parsed back out of a document's `header: value`
/// text rendering. Prices keep their display string so the catalog's
/// currency glyph is never substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub brand: String,
    pub name: String,
    pub price: f64,
    pub price_display: String,
    pub mrp_display: Option<String>,
    pub offer: Option<String>,
}

const BRAND_KEYS: &[&str] = &["brand", "brand name", "brand_name"];
const NAME_KEYS: &[&str] = &["name", "product", "product name", "product_name", "title"];
const PRICE_KEYS: &[&str] = &["price", "selling price", "selling_price"];
const MRP_KEYS: &[&str] = &["mrp"];
const OFFER_KEYS: &[&str] = &["offer", "discount"];

impl ProductRecord {
    /// Parse a product out of document text. Returns `None` when the text
    /// does not carry at least a product name and a numeric price, which is
    /// how non-product context is told apart from catalog rows.
    #[inline]
    pub fn parse(text: &str) -> Option<Self> {
        let fields: BTreeMap<String, String> = text
            .lines()
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                Some((
                    key.trim().to_lowercase(),
                    value.trim().to_string(),
                ))
            })
            .collect();

        let name = lookup(&fields, NAME_KEYS)?;
        let price_display = lookup(&fields, PRICE_KEYS)?;
        let price = parse_price(&price_display)?;

        Some(Self {
            brand: lookup(&fields, BRAND_KEYS).unwrap_or_default(),
            name,
            price,
            price_display,
            mrp_display: lookup(&fields, MRP_KEYS),
            offer: lookup(&fields, OFFER_KEYS),
        })
    }

    /// Currency glyph of the catalog price, e.g. `₹` for `₹499.00`.
    /// Defaults to the rupee glyph when the display string has none.
    #[inline]
    pub fn currency_glyph(&self) -> String {
        currency_glyph(&self.price_display)
    }
}

fn lookup(fields: &BTreeMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| fields.get(*key))
        .filter(|value| !value.is_empty())
        .cloned()
}

/// Extract the numeric value from a price display string such as
/// `₹1,299.00` or `Rs. 450`. Anything before the first digit is currency
/// prefix and is skipped so its punctuation never leaks into the number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let numeric: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match numeric.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!("Could not parse price from '{}'", raw);
            None
        }
    }
}

/// Leading non-numeric characters of a price display string.
pub fn currency_glyph(display: &str) -> String {
    let glyph: String = display
        .trim()
        .chars()
        .take_while(|c| !c.is_ascii_digit())
        .collect();
    let glyph = glyph.trim().to_string();

    if glyph.is_empty() {
        "₹".to_string()
    } else {
        glyph
    }
}
