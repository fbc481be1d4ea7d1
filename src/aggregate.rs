//! Single-pass aggregation over cleaned rows.
//!
//! [`RowAccumulator`] is a plain value folded over the row sequence; every
//! call to [`aggregate`] builds its own and throws it away afterwards. The
//! only order-dependent work happens in [`RowAccumulator::finish`], where
//! product counts are ranked and month buckets emitted.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    config::{DEFAULT_TOP_PRODUCTS, DEFAULT_UNKNOWN_PRODUCT_LABEL},
    normalize::StockStatus,
    rows::CleanedRow,
};

#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub top_products: usize,
    pub unknown_product_label: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            top_products: DEFAULT_TOP_PRODUCTS,
            unknown_product_label: DEFAULT_UNKNOWN_PRODUCT_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_rows: usize,
    pub missing: MissingCounts,
    pub stats: NumericStats,
    pub top_products: Vec<ProductCount>,
    pub instock_counts: StockCounts,
    pub monthly: Vec<MonthlyPoint>,
}

/// Null counts per tracked field. `review` is deliberately absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MissingCounts {
    pub product: usize,
    pub price: usize,
    pub rating: usize,
    pub instock: usize,
    pub launch_date: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericStats {
    pub price: NumericSummary,
    pub rating: NumericSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCount {
    pub product: String,
    pub count: usize,
}

/// Stock buckets. Absent and unrecognized values share the `null` bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockCounts {
    #[serde(rename = "true")]
    pub in_stock: usize,
    #[serde(rename = "false")]
    pub out_of_stock: usize,
    #[serde(rename = "null")]
    pub unknown: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub count: usize,
    pub avg_price: Option<f64>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct NumericAccumulator {
    count: usize,
    mean: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericAccumulator {
    /// Keeps a running mean instead of a sum, so finite inputs always yield a
    /// finite mean.
    fn add(&mut self, value: f64) {
        self.count += 1;
        let n = self.count as f64;
        self.mean = if self.count == 1 {
            value
        } else {
            self.mean + (value / n - self.mean / n)
        };
        self.min = Some(self.min.map_or(value, |current| current.min(value)));
        self.max = Some(self.max.map_or(value, |current| current.max(value)));
    }

    fn add_optional(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.add(value);
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    fn summary(&self) -> NumericSummary {
        NumericSummary {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.mean(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MonthAccumulator {
    count: usize,
    price: NumericAccumulator,
    rating: NumericAccumulator,
}

#[derive(Debug, Default)]
pub struct RowAccumulator {
    total_rows: usize,
    missing: MissingCounts,
    price: NumericAccumulator,
    rating: NumericAccumulator,
    products: HashMap<Option<String>, usize>,
    stock: StockCounts,
    months: BTreeMap<String, MonthAccumulator>,
}

impl RowAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, row: &CleanedRow) {
        self.total_rows += 1;

        self.missing.product += usize::from(row.product.is_none());
        self.missing.price += usize::from(row.price.is_none());
        self.missing.rating += usize::from(row.rating.is_none());
        self.missing.instock += usize::from(row.instock.is_none());
        self.missing.launch_date += usize::from(row.launch_date.is_none());

        self.price.add_optional(row.price);
        self.rating.add_optional(row.rating);

        *self.products.entry(row.product.clone()).or_insert(0) += 1;

        match row.instock {
            Some(StockStatus::InStock) => self.stock.in_stock += 1,
            Some(StockStatus::OutOfStock) => self.stock.out_of_stock += 1,
            Some(StockStatus::Unknown) | None => self.stock.unknown += 1,
        }

        if let Some(month) = row.launch_month() {
            let bucket = self.months.entry(month.to_string()).or_default();
            bucket.count += 1;
            bucket.price.add_optional(row.price);
            bucket.rating.add_optional(row.rating);
        }
    }

    pub fn finish(self, options: &AggregateOptions) -> Analytics {
        Analytics {
            total_rows: self.total_rows,
            missing: self.missing,
            stats: NumericStats {
                price: self.price.summary(),
                rating: self.rating.summary(),
            },
            top_products: rank_products(self.products, options),
            instock_counts: self.stock,
            monthly: self
                .months
                .into_iter()
                .map(|(month, bucket)| MonthlyPoint {
                    month,
                    count: bucket.count,
                    avg_price: bucket.price.mean(),
                    avg_rating: bucket.rating.mean(),
                })
                .collect(),
        }
    }
}

/// Highest counts first; ties broken alphabetically so output never depends
/// on hash order. A product literally named like the unknown label merges
/// with the null bucket.
fn rank_products(
    products: HashMap<Option<String>, usize>,
    options: &AggregateOptions,
) -> Vec<ProductCount> {
    let mut merged: HashMap<String, usize> = HashMap::new();
    for (product, count) in products {
        let label = product.unwrap_or_else(|| options.unknown_product_label.clone());
        *merged.entry(label).or_insert(0) += count;
    }
    merged
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(options.top_products)
        .map(|(product, count)| ProductCount { product, count })
        .collect()
}

pub fn aggregate<'a, I>(rows: I, options: &AggregateOptions) -> Analytics
where
    I: IntoIterator<Item = &'a CleanedRow>,
{
    rows.into_iter()
        .fold(RowAccumulator::new(), |mut acc, row| {
            acc.ingest(row);
            acc
        })
        .finish(options)
}
