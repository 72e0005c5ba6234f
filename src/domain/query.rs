use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, Coordinates, PriceRange, TypeConstraintError};

/// Ordering applied to search results.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Rating descending, then review count descending.
    Rating,
    /// Review count descending.
    Reviews,
    /// Name ascending, case-insensitive.
    Name,
    /// Distance from the reference point ascending.
    Distance,
    /// Most recently added first.
    Date,
}

impl TryFrom<&str> for SortBy {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "rating" => Ok(Self::Rating),
            "reviews" => Ok(Self::Reviews),
            "name" => Ok(Self::Name),
            "distance" => Ok(Self::Distance),
            "date" => Ok(Self::Date),
            other => Err(TypeConstraintError::InvalidValue(format!("sort: {other}"))),
        }
    }
}

/// Criteria for a business search.
///
/// Every criterion is optional; an empty request returns all active businesses
/// in the default order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// Case-insensitive substring matched against name, description and address.
    pub query: Option<String>,
    pub category_ids: BTreeSet<CategoryId>,
    pub price_ranges: BTreeSet<PriceRange>,
    /// Minimum rating, inclusive. Zero or absent disables the filter.
    pub rating: Option<f64>,
    pub featured: Option<bool>,
    pub verified: Option<bool>,
    /// Search radius in kilometres around `near`.
    pub radius: Option<f64>,
    pub near: Option<Coordinates>,
    pub sort_by: Option<SortBy>,
    /// 1-based page; values below one are treated as one.
    pub page: Option<i64>,
    /// Page size; zero or negative values fall back to the default.
    pub limit: Option<i64>,
}

impl SearchRequest {
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_ids.insert(category_id);
        self
    }

    pub fn price_range(mut self, price_range: PriceRange) -> Self {
        self.price_ranges.insert(price_range);
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn within(mut self, near: Coordinates, radius_km: f64) -> Self {
        self.near = Some(near);
        self.radius = Some(radius_km);
        self
    }

    pub fn sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn paginate(mut self, page: i64, limit: i64) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Page number clamped to at least one.
    pub fn effective_page(&self) -> usize {
        self.page.filter(|p| *p >= 1).unwrap_or(1) as usize
    }

    /// Page size, falling back to `default` when absent or not positive.
    pub fn effective_limit(&self, default: usize) -> usize {
        self.limit
            .filter(|l| *l > 0)
            .map(|l| l as usize)
            .unwrap_or(default.max(1))
    }
}
