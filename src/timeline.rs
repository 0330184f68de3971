use serde::{Deserialize, Serialize};

use crate::schema::YearSeries;

/// Ordered year/price series ready for plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub years: Vec<String>,
    pub prices: Vec<f64>,
    pub current_year: String,
    pub current_price: f64,
}

impl Timeline {
    /// Merges history, forecast and the current-year price into one series.
    ///
    /// The current year wins over a past or future entry with the same label,
    /// and a future entry wins over a past one. Years are ordered by string
    /// comparison of their labels.
    pub fn assemble(
        past_prices: &YearSeries,
        future_prices: &YearSeries,
        current_year: &str,
        current_price: f64,
    ) -> Self {
        let mut merged = past_prices.clone();
        merged.extend(future_prices.iter().map(|(y, p)| (y.clone(), *p)));
        merged.insert(current_year.to_string(), current_price);

        let (years, prices) = merged.into_iter().unzip();

        Self {
            years,
            prices,
            current_year: current_year.to_string(),
            current_price,
        }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Position of the current year within `years`.
    pub fn current_index(&self) -> Option<usize> {
        self.years.iter().position(|y| *y == self.current_year)
    }

    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.years
            .iter()
            .map(String::as_str)
            .zip(self.prices.iter().copied())
    }

    /// (min, max) over all prices, or `None` for an empty timeline.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut prices = self.prices.iter().copied();
        let first = prices.next()?;
        Some(prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}
