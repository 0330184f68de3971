use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{ForecastError, Result};
use crate::metrics::{round2, ForecastMetrics};

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 10;
pub const DEFAULT_YEARS: u32 = 3;

/// Year label (as the model wrote it, e.g. "2023") mapped to a value.
///
/// Labels are kept as strings and ordered lexically; nothing guarantees they
/// are four-digit years.
pub type YearSeries = BTreeMap<String, f64>;

/// One product/country query, built from the submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub product_name: String,
    pub country: String,
    #[serde(default = "default_years")]
    pub past_years: u32,
    #[serde(default = "default_years")]
    pub future_years: u32,
}

fn default_years() -> u32 {
    DEFAULT_YEARS
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self::new("", "", DEFAULT_YEARS, DEFAULT_YEARS)
    }
}

impl ForecastRequest {
    pub fn new(
        product_name: impl Into<String>,
        country: impl Into<String>,
        past_years: u32,
        future_years: u32,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            country: country.into(),
            past_years,
            future_years,
        }
    }

    /// Checks both year counts lie in `[MIN_YEARS, MAX_YEARS]`.
    ///
    /// Product and country are free text and passed to the model verbatim.
    pub fn validate(&self) -> Result<()> {
        validate_year_count("past_years", self.past_years)?;
        validate_year_count("future_years", self.future_years)?;
        Ok(())
    }
}

fn validate_year_count(field: &str, value: u32) -> Result<()> {
    if !(MIN_YEARS..=MAX_YEARS).contains(&value) {
        return Err(ForecastError::InvalidRequest(format!(
            "{} must be between {} and {}, got {}",
            field, MIN_YEARS, MAX_YEARS, value
        )));
    }
    Ok(())
}

/// The structured data decoded from the model's answer.
///
/// Every field is optional on the wire: absent or `null` maps decode as empty
/// and an absent or `null` `current_price` decodes as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub past_prices: YearSeries,
    #[serde(default, deserialize_with = "null_as_default")]
    pub future_prices: YearSeries,
    #[serde(default, deserialize_with = "null_as_default")]
    pub yearly_percentage_change: YearSeries,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_price: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ForecastResult {
    /// Charting needs both a history and a forecast.
    pub fn has_both_series(&self) -> bool {
        !self.past_prices.is_empty() && !self.future_prices.is_empty()
    }
}

/// What the user sees as "the JSON result": the model's data plus the derived
/// figures, rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub past_prices: YearSeries,
    pub future_prices: YearSeries,
    pub yearly_percentage_change: YearSeries,
    pub current_price: f64,
    pub average_past_price: f64,
    pub average_future_price: f64,
    pub overall_percentage_change: f64,
}

impl ForecastSummary {
    pub fn new(result: &ForecastResult, metrics: &ForecastMetrics) -> Self {
        let rounded = metrics.rounded();
        Self {
            past_prices: result.past_prices.clone(),
            future_prices: result.future_prices.clone(),
            yearly_percentage_change: result.yearly_percentage_change.clone(),
            current_price: round2(result.current_price),
            average_past_price: rounded.average_past_price,
            average_future_price: rounded.average_future_price,
            overall_percentage_change: rounded.overall_percentage_change,
        }
    }
}
