use std::sync::LazyLock;

use fancy_regex::Regex;
use tracing::debug;

use crate::policy::products::ProductRecord;

static BETWEEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)between\s+(?:rs\.?|rupees|inr|₹)?\s*(\d+(?:\.\d+)?)\s+and\s+(?:rs\.?|rupees|inr|₹)?\s*(\d+(?:\.\d+)?)",
    )
    .expect("regex is valid")
});

static UPPER_BOUND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:under|below|less than|cheaper than|within|up\s?to|at most)\s+(?:rs\.?|rupees|inr|₹)?\s*(\d+(?:\.\d+)?)",
    )
    .expect("regex is valid")
});

static LOWER_BOUND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:above|over|more than|at least|costlier than)\s+(?:rs\.?|rupees|inr|₹)?\s*(\d+(?:\.\d+)?)",
    )
    .expect("regex is valid")
});

/// An inclusive price window with independently omittable bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    #[inline]
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Pull a price window out of free user text: "under 500",
    /// "above rupees 300", "between 500 and 900", "under 1000 and above 500".
    /// Returns `None` when the text states no price constraint.
    #[inline]
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(Some(captures)) = BETWEEN_REGEX.captures(text) {
            let first: f64 = captures.get(1)?.as_str().parse().ok()?;
            let second: f64 = captures.get(2)?.as_str().parse().ok()?;
            let range = Self::new(Some(first.min(second)), Some(first.max(second)));
            debug!("Parsed price range {:?} from '{}'", range, text);
            return Some(range);
        }

        let max = match UPPER_BOUND_REGEX.captures(text) {
            Ok(Some(captures)) => captures.get(1).and_then(|m| m.as_str().parse().ok()),
            _ => None,
        };
        let min = match LOWER_BOUND_REGEX.captures(text) {
            Ok(Some(captures)) => captures.get(1).and_then(|m| m.as_str().parse().ok()),
            _ => None,
        };

        if min.is_none() && max.is_none() {
            return None;
        }

        let range = Self::new(min, max);
        debug!("Parsed price range {:?} from '{}'", range, text);
        Some(range)
    }

    /// `L <= price <= U`, with each bound optional.
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        if let Some(min) = self.min
            && price < min
        {
            return false;
        }
        if let Some(max) = self.max
            && price > max
        {
            return false;
        }
        true
    }

    /// Keep every product whose price satisfies the window. All qualifying
    /// products survive; none are silently dropped.
    #[inline]
    pub fn filter_products<'a>(&self, products: &'a [ProductRecord]) -> Vec<&'a ProductRecord> {
        products
            .iter()
            .filter(|product| self.contains(product.price))
            .collect()
    }
}
