use log::debug;

use crate::error::{ForecastError, Result};
use crate::schema::ForecastResult;

/// Returns the widest `{...}` span: first `{` through last `}`.
///
/// Braces in prose after the object widen the span too; callers get whatever
/// falls between the two.
pub fn find_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Pulls a `ForecastResult` out of free-form model output.
///
/// `Extraction` when no span exists, `Parse` when the span does not decode.
pub fn extract_forecast(raw: &str) -> Result<ForecastResult> {
    let span = find_json_span(raw).ok_or(ForecastError::Extraction)?;
    debug!(
        "Found JSON span of {} bytes in {} byte response",
        span.len(),
        raw.len()
    );

    serde_json::from_str(span).map_err(|e| ForecastError::Parse(e.to_string()))
}
