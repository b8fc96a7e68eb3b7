use crate::Category;
use serde::Serialize;
use std::collections::BTreeMap;

/// One table row of the aggregate view.
#[derive(Debug, Clone, Serialize)]
pub struct StatsRow {
    pub category: Category,
    pub count: u64,
    /// Share of the grand total, in percent.
    pub percent: f64,
}

/// Aggregate counters ready for rendering. `rows` is empty when nothing
/// has been classified yet (the UI shows a placeholder instead).
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub rows: Vec<StatsRow>,
    pub total: u64,
}

impl StatsReport {
    /// Build the report from raw counts. Categories without a record and
    /// zero counts are omitted; rows keep category enumeration order.
    pub fn from_counts(counts: &BTreeMap<Category, u64>) -> Self {
        let total: u64 = counts.values().sum();

        let rows = if total == 0 {
            Vec::new()
        } else {
            Category::ALL
                .iter()
                .filter_map(|category| {
                    let count = counts.get(category).copied().unwrap_or(0);
                    (count > 0).then_some(StatsRow {
                        category: *category,
                        count,
                        percent: count as f64 / total as f64 * 100.0,
                    })
                })
                .collect()
        };

        Self { rows, total }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_counts_produce_no_rows() {
        let report = StatsReport::from_counts(&BTreeMap::new());
        assert!(report.is_empty());
        assert_eq!(report.total, 0);
    }

    #[test]
    fn zero_count_categories_are_omitted() {
        let mut counts = BTreeMap::new();
        counts.insert(Category::Glass, 3);
        counts.insert(Category::Metal, 0);

        let report = StatsReport::from_counts(&counts);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].category, Category::Glass);
        assert_eq!(report.total, 3);
    }

    #[test]
    fn percents_sum_to_one_hundred() {
        let mut counts = BTreeMap::new();
        counts.insert(Category::Glass, 7);
        counts.insert(Category::Metal, 11);
        counts.insert(Category::Organic, 2);
        counts.insert(Category::Plastic, 13);

        let report = StatsReport::from_counts(&counts);
        let sum: f64 = report.rows.iter().map(|r| r.percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rows_follow_category_order() {
        let mut counts = BTreeMap::new();
        counts.insert(Category::Plastic, 1);
        counts.insert(Category::Glass, 1);

        let report = StatsReport::from_counts(&counts);
        let order: Vec<Category> = report.rows.iter().map(|r| r.category).collect();
        assert_eq!(order, vec![Category::Glass, Category::Plastic]);
    }
}
