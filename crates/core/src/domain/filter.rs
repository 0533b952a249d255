use crate::domain::price::PriceRange;
use crate::domain::product::Product;

/// Structured product filter: optional category plus optional price bucket,
/// combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub price_range: Option<PriceRange>,
}

impl ProductFilter {
    /// Builds a filter from raw request values. Empty categories and unknown
    /// bucket labels impose no constraint.
    pub fn from_params(category: Option<&str>, price_range: Option<&str>) -> Self {
        Self {
            category: category.filter(|value| !value.is_empty()).map(str::to_string),
            price_range: price_range.and_then(PriceRange::from_label),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none() && self.price_range.is_none()
    }

    pub fn matches(&self, product: &Product) -> bool {
        let category_ok =
            self.category.as_deref().map_or(true, |category| product.matches_category(category));
        let price_ok = self.price_range.map_or(true, |range| range.contains(&product.price));
        category_ok && price_ok
    }
}
