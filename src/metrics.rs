use serde::{Deserialize, Serialize};

use crate::schema::YearSeries;

/// Averages and trend derived from a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    pub average_past_price: f64,
    pub average_future_price: f64,
    pub overall_percentage_change: f64,
}

impl ForecastMetrics {
    /// The same figures rounded to two decimals for display.
    pub fn rounded(&self) -> Self {
        Self {
            average_past_price: round2(self.average_past_price),
            average_future_price: round2(self.average_future_price),
            overall_percentage_change: round2(self.overall_percentage_change),
        }
    }
}

/// Computes the averages and the change between them at full precision.
///
/// An empty series averages to zero, and a zero past average yields a zero
/// change rather than a division error. `current_price` does not enter any of
/// the figures; it is accepted so callers pass the whole forecast in one place.
pub fn compute_metrics(
    past_prices: &YearSeries,
    future_prices: &YearSeries,
    _current_price: f64,
) -> ForecastMetrics {
    let average_past_price = mean(past_prices);
    let average_future_price = mean(future_prices);

    let overall_percentage_change = if average_past_price != 0.0 {
        (average_future_price - average_past_price) / average_past_price * 100.0
    } else {
        0.0
    };

    ForecastMetrics {
        average_past_price,
        average_future_price,
        overall_percentage_change,
    }
}

fn mean(series: &YearSeries) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.values().sum::<f64>() / series.len() as f64
}

/// Rounds to two decimals. Values too large to scale are already coarser than
/// a cent and come back unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
