use chrono::{Datelike, Local};
use log::{debug, info};
use serde::Serialize;

use crate::error::{ForecastError, Result};
use crate::llm::{build_forecast_prompt, extract_forecast, CompletionClient};
use crate::metrics::{compute_metrics, ForecastMetrics};
use crate::schema::{ForecastRequest, ForecastResult, ForecastSummary};
use crate::timeline::Timeline;

/// Everything one submission produced, ready for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub request: ForecastRequest,
    pub current_year: i32,
    pub result: ForecastResult,
    pub metrics: ForecastMetrics,
    pub summary: ForecastSummary,
}

impl ForecastReport {
    pub fn from_result(request: ForecastRequest, current_year: i32, result: ForecastResult) -> Self {
        let metrics = compute_metrics(
            &result.past_prices,
            &result.future_prices,
            result.current_price,
        );
        let summary = ForecastSummary::new(&result, &metrics);
        Self {
            request,
            current_year,
            result,
            metrics,
            summary,
        }
    }

    /// The merged chart series; `MissingData` unless both history and forecast
    /// came back non-empty.
    pub fn timeline(&self) -> Result<Timeline> {
        if !self.result.has_both_series() {
            return Err(ForecastError::MissingData);
        }
        Ok(Timeline::assemble(
            &self.result.past_prices,
            &self.result.future_prices,
            &self.current_year.to_string(),
            self.result.current_price,
        ))
    }
}

/// Prompt, complete, extract, compute. One call per submission, no retries.
pub struct ForecastPipeline<C> {
    client: C,
    fixed_year: Option<i32>,
}

impl<C: CompletionClient> ForecastPipeline<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            fixed_year: None,
        }
    }

    /// Pins the "current year" instead of reading the local clock.
    pub fn with_fixed_year(mut self, year: i32) -> Self {
        self.fixed_year = Some(year);
        self
    }

    pub fn current_year(&self) -> i32 {
        self.fixed_year.unwrap_or_else(|| Local::now().year())
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs against the pinned year, or the local calendar year when none is set.
    pub async fn run(&self, request: ForecastRequest) -> Result<ForecastReport> {
        self.run_for_year(request, self.current_year()).await
    }

    pub async fn run_for_year(
        &self,
        request: ForecastRequest,
        current_year: i32,
    ) -> Result<ForecastReport> {
        request.validate()?;

        info!(
            "Requesting forecast for '{}' in '{}' ({} past / {} future years) from {}",
            request.product_name,
            request.country,
            request.past_years,
            request.future_years,
            self.client.name()
        );

        let prompt = build_forecast_prompt(
            &request.product_name,
            &request.country,
            request.past_years,
            request.future_years,
            current_year,
        );

        let reply = self.client.generate(&prompt).await?;
        debug!("Completion returned {} bytes", reply.len());

        let result = extract_forecast(reply.trim())?;
        debug!(
            "Extracted {} past, {} future and {} change entries",
            result.past_prices.len(),
            result.future_prices.len(),
            result.yearly_percentage_change.len()
        );

        Ok(ForecastReport::from_result(request, current_year, result))
    }
}
