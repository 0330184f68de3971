//! HTML and SVG output for the single-page form.
//!
//! Everything here is plain string building so the page can be checked in
//! tests without a browser or a running server.

use crate::error::{ForecastError, Result};
use crate::pipeline::ForecastReport;
use crate::schema::{ForecastRequest, YearSeries, MAX_YEARS, MIN_YEARS};
use crate::timeline::Timeline;

const CHART_WIDTH: f64 = 800.0;
const CHART_HEIGHT: f64 = 400.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 60.0;
const Y_TICKS: usize = 5;

/// What to show under the form after a submission.
#[derive(Debug)]
pub enum Outcome<'a> {
    Report(&'a ForecastReport),
    Failed(&'a ForecastError),
}

/// The four headline lines shown under the chart.
pub fn summary_lines(report: &ForecastReport) -> Vec<String> {
    let m = &report.metrics;
    vec![
        format!(
            "Current Price ({}): {:.2}",
            report.current_year, report.result.current_price
        ),
        format!("Average Past Price: {:.2}", m.average_past_price),
        format!("Average Future Price: {:.2}", m.average_future_price),
        format!(
            "Overall Expected Change: {:+.2}%",
            m.overall_percentage_change
        ),
    ]
}

pub fn chart_title(request: &ForecastRequest) -> String {
    format!(
        "Price Forecast for {} in {}",
        request.product_name, request.country
    )
}

/// Line-and-marker chart of the timeline with the current year drawn in red.
pub fn render_chart_svg(title: &str, timeline: &Timeline) -> String {
    let plot_w = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let (mut lo, mut hi) = timeline.price_range().unwrap_or((0.0, 1.0));
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    let pad = (hi - lo) * 0.1;
    lo -= pad;
    hi += pad;

    let n = timeline.len();
    let x_at = |i: usize| {
        if n <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |price: f64| MARGIN_TOP + plot_h * (hi - price) / (hi - lo);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" class="chart">
<text x="{cx}" y="25" text-anchor="middle" font-size="18">{title}</text>
"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        cx = CHART_WIDTH / 2.0,
        title = escape_html(title),
    );

    // grid and y axis labels
    for tick in 0..=Y_TICKS {
        let value = lo + (hi - lo) * tick as f64 / Y_TICKS as f64;
        let y = y_at(value);
        svg.push_str(&format!(
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#ddd"/>
<text x="{lx:.1}" y="{ty:.1}" text-anchor="end" font-size="12">{value:.2}</text>
"##,
            x1 = MARGIN_LEFT,
            x2 = MARGIN_LEFT + plot_w,
            lx = MARGIN_LEFT - 8.0,
            ty = y + 4.0,
        ));
    }

    for (i, year) in timeline.years.iter().enumerate() {
        let x = x_at(i);
        svg.push_str(&format!(
            r##"<line x1="{x:.1}" y1="{y1:.1}" x2="{x:.1}" y2="{y2:.1}" stroke="#eee"/>
<text x="{x:.1}" y="{ly:.1}" text-anchor="middle" font-size="12">{label}</text>
"##,
            y1 = MARGIN_TOP,
            y2 = MARGIN_TOP + plot_h,
            ly = MARGIN_TOP + plot_h + 20.0,
            label = escape_html(year),
        ));
    }

    svg.push_str(&format!(
        r#"<text x="{cx:.1}" y="{by:.1}" text-anchor="middle" font-size="14">Year</text>
<text x="18" y="{cy:.1}" text-anchor="middle" font-size="14" transform="rotate(-90 18 {cy:.1})">Price</text>
"#,
        cx = MARGIN_LEFT + plot_w / 2.0,
        by = CHART_HEIGHT - 12.0,
        cy = MARGIN_TOP + plot_h / 2.0,
    ));

    let points: Vec<String> = timeline
        .prices
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.1},{:.1}", x_at(i), y_at(*p)))
        .collect();
    svg.push_str(&format!(
        "<polyline fill=\"none\" stroke=\"blue\" stroke-width=\"2\" points=\"{}\"/>\n",
        points.join(" ")
    ));

    for (i, (year, price)) in timeline.points().enumerate() {
        svg.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"blue\"><title>{}: {:.2}</title></circle>\n",
            x_at(i),
            y_at(price),
            escape_html(year),
            price
        ));
    }

    if let Some(i) = timeline.current_index() {
        svg.push_str(&format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="6" fill="red" class="current"/>
<circle cx="{lx:.1}" cy="{ly:.1}" r="5" fill="red"/>
<text x="{tx:.1}" y="{ty:.1}" font-size="12">Current Price</text>
"#,
            x_at(i),
            y_at(timeline.current_price),
            lx = CHART_WIDTH - MARGIN_RIGHT - 110.0,
            ly = MARGIN_TOP - 12.0,
            tx = CHART_WIDTH - MARGIN_RIGHT - 100.0,
            ty = MARGIN_TOP - 8.0,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_change_table(changes: &YearSeries) -> String {
    if changes.is_empty() {
        return String::new();
    }
    let mut html = String::from(
        "<h3>Yearly Percentage Change</h3>\n<table class=\"changes\">\n<tr><th>Year</th><th>Change</th></tr>\n",
    );
    for (year, change) in changes {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:+.2}%</td></tr>\n",
            escape_html(year),
            change
        ));
    }
    html.push_str("</table>\n");
    html
}

fn render_form(form: &ForecastRequest) -> String {
    format!(
        r#"<form method="post" action="/forecast">
<label>Product Name <input type="text" name="product_name" value="{product}" placeholder="e.g., Coca Cola 1L"></label>
<label>Country <input type="text" name="country" value="{country}" placeholder="e.g., Pakistan"></label>
<label>Past Years <input type="number" name="past_years" min="{min}" max="{max}" value="{past}"></label>
<label>Future Years <input type="number" name="future_years" min="{min}" max="{max}" value="{future}"></label>
<button type="submit">Get Forecast</button>
</form>
"#,
        product = escape_html(&form.product_name),
        country = escape_html(&form.country),
        min = MIN_YEARS,
        max = MAX_YEARS,
        past = form.past_years,
        future = form.future_years,
    )
}

fn error_banner(message: &str) -> String {
    format!(
        "<div class=\"error\" role=\"alert\">{}</div>\n",
        escape_html(message)
    )
}

fn render_report(report: &ForecastReport) -> Result<String> {
    let json = serde_json::to_string_pretty(&report.summary)?;
    let mut html = format!(
        "<h2>Forecast Result (JSON)</h2>\n<pre class=\"json\">{}</pre>\n",
        escape_html(&json)
    );

    match report.timeline() {
        Ok(timeline) => {
            html.push_str(&render_chart_svg(&chart_title(&report.request), &timeline));
            html.push_str("<h2>Price Averages and Trend</h2>\n<ul class=\"summary\">\n");
            for line in summary_lines(report) {
                html.push_str(&format!("<li>{}</li>\n", escape_html(&line)));
            }
            html.push_str("</ul>\n");
            html.push_str(&render_change_table(&report.result.yearly_percentage_change));
        }
        Err(e) => html.push_str(&error_banner(&e.to_string())),
    }

    Ok(html)
}

/// The whole page: form (re-populated with `form`) plus any outcome.
pub fn render_page(form: &ForecastRequest, outcome: Option<Outcome<'_>>) -> String {
    let body = match outcome {
        None => String::new(),
        Some(Outcome::Report(report)) => match render_report(report) {
            Ok(html) => html,
            Err(e) => error_banner(&format!("\u{274C} Error: {}", e)),
        },
        Some(Outcome::Failed(e)) => error_banner(&format!("\u{274C} Error: {}", e)),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Product Price Forecaster</title>
<style>
body {{ font-family: sans-serif; max-width: 860px; margin: 2rem auto; }}
form label {{ display: block; margin: 0.5rem 0; }}
.error {{ background: #fdecea; color: #611a15; padding: 0.75rem; border-radius: 4px; }}
pre.json {{ background: #f6f8fa; padding: 0.75rem; overflow-x: auto; }}
</style>
</head>
<body>
<h1>&#x1F6D2; Product Price Forecast (AI Powered by Gemini)</h1>
<p>Enter your product details below:</p>
{form}{body}</body>
</html>
"#,
        form = render_form(form),
        body = body,
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
