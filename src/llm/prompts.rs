// Instruction text sent to the completion service for a price forecast.

const FORECAST_OUTPUT_CONTRACT: &str = r#"Return STRICTLY a valid JSON object with exactly four keys:
- "past_prices": dictionary of year: price, one entry per past year.
- "future_prices": dictionary of year: price, one entry per future year.
- "yearly_percentage_change": dictionary of year: percentage change compared to the previous year.
- "current_price": float (the price for the current year {current_year})

Shape:
{
  "past_prices": {"<year>": <float>, ...},
  "future_prices": {"<year>": <float>, ...},
  "yearly_percentage_change": {"<year>": <float>, ...},
  "current_price": <float>
}

Each price must be a float (decimal number) and each percentage change must be a float too.
No text, no explanation, no markdown fences. Only the raw JSON object."#;

/// Builds the forecast instruction for one product/country pair.
///
/// Inputs are embedded verbatim; year counts are not re-checked here.
pub fn build_forecast_prompt(
    product_name: &str,
    country: &str,
    past_years: u32,
    future_years: u32,
    current_year: i32,
) -> String {
    let contract = FORECAST_OUTPUT_CONTRACT.replace("{current_year}", &current_year.to_string());

    format!(
        "You are an economic expert.\n\
         Generate a realistic price history and forecast for:\n\n\
         Product: {}\n\
         Country: {}\n\
         Past Years: {}\n\
         Future Years: {}\n\
         Current Year: {}\n\n\
         {}\n",
        product_name, country, past_years, future_years, current_year, contract
    )
}
