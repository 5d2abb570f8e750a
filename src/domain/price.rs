//! Daily closing-price series.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Closing prices sorted by date, one point per day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

/// Closing prices per ticker.
pub type PriceTable = HashMap<String, PriceSeries>;

impl PriceSeries {
    /// Build a series, dropping non-finite closes and keeping the last
    /// value seen for duplicated dates.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| p.close.is_finite())
            .collect();
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[must_use]
    pub fn first(&self) -> Option<PricePoint> {
        self.points.first().copied()
    }

    /// Most recent close.
    #[must_use]
    pub fn last(&self) -> Option<PricePoint> {
        self.points.last().copied()
    }

    /// The point closest in calendar days to `date`. Ties go to the earlier point.
    #[must_use]
    pub fn nearest(&self, date: NaiveDate) -> Option<PricePoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        let after = self.points.get(idx).copied();
        let before = idx
            .checked_sub(1)
            .and_then(|i| self.points.get(i))
            .copied();

        match (before, after) {
            (Some(b), Some(a)) => {
                let db = (date - b.date).num_days();
                let da = (a.date - date).num_days();
                Some(if da < db { a } else { b })
            }
            (Some(b), None) => Some(b),
            (None, a) => a,
        }
    }

    /// First point dated on or after `date`.
    #[must_use]
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<PricePoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        self.points.get(idx).copied()
    }

    /// Last point dated on or before `date`.
    #[must_use]
    pub fn last_on_or_before(&self, date: NaiveDate) -> Option<PricePoint> {
        let idx = self.points.partition_point(|p| p.date <= date);
        idx.checked_sub(1).and_then(|i| self.points.get(i)).copied()
    }

    /// Merge another series into this one; points in `other` win on equal dates.
    pub fn merge(&mut self, other: &PriceSeries) {
        let combined = self.points.iter().chain(other.points.iter()).copied();
        *self = Self::new(combined);
    }
}
