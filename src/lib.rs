//! # Price Forecaster
//!
//! Asks a generative language model for a plausible price history and forecast
//! of a product in a country, then derives averages and an overall trend and
//! renders them as JSON, a chart and a short summary.
//!
//! ## Pipeline
//!
//! 1. [`llm::build_forecast_prompt`] writes the instruction, demanding a fixed
//!    four-key JSON object back
//! 2. a [`llm::CompletionClient`] turns it into free-form text
//! 3. [`llm::extract_forecast`] pulls the widest `{...}` span out of that text
//!    and decodes it, defaulting any missing keys
//! 4. [`metrics::compute_metrics`] averages past and future prices and compares them
//! 5. [`timeline::Timeline`] and [`render`] turn the result into a page
//!
//! ## Example
//!
//! ```rust,ignore
//! use price_forecaster::*;
//!
//! let client = llm::GeminiClient::new(llm::GeminiConfig::new(api_key))?;
//! let pipeline = ForecastPipeline::new(client);
//! let report = pipeline
//!     .run(ForecastRequest::new("Coca Cola 1L", "Pakistan", 3, 3))
//!     .await?;
//!
//! for line in render::summary_lines(&report) {
//!     println!("{}", line);
//! }
//! ```

pub mod error;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod timeline;

#[cfg(feature = "gemini")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use error::{ForecastError, Result};
pub use metrics::{compute_metrics, round2, ForecastMetrics};
pub use pipeline::{ForecastPipeline, ForecastReport};
pub use schema::*;
pub use timeline::Timeline;
