//! Statement palette and number formatting.

use crate::elements::Color;

/// Table header fill.
pub const HEADER_GRAY: Color = Color::from_rgb8(230, 230, 230);
/// Category total row fill.
pub const TOTAL_TINT: Color = Color::from_rgb8(240, 240, 240);
/// Grand total row fill on the summary page.
pub const SUMMARY_TINT: Color = Color::from_rgb8(230, 243, 255);
/// Cash-equivalent share of the allocation chart.
pub const PIE_TEAL: Color = Color::from_rgb8(183, 227, 228);
/// Equity share of the allocation chart.
pub const PIE_GREEN: Color = Color::from_rgb8(181, 213, 167);
/// Headings.
pub const MAROON: Color = Color::from_rgb8(139, 0, 0);
/// Losses and alerts.
pub const LOSS_RED: Color = Color::from_rgb8(205, 0, 0);
/// Body accents and chart strokes.
pub const SLATE: Color = Color::from_rgb8(47, 79, 79);
/// Chart grid lines.
pub const GRID_GRAY: Color = Color::from_rgb8(200, 200, 200);

/// Format an amount with two decimals and 3-digit grouping.
pub fn format_amount(value: f64) -> String {
    group(format!("{:.2}", value))
}

/// Format a value rounded to a whole number with 3-digit grouping.
pub fn format_int(value: f64) -> String {
    group(format!("{:.0}", value))
}

/// Insert thousands separators into an already-formatted decimal string.
fn group(formatted: String) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (integral, fraction) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(integral.len() + integral.len() / 3);
    for (i, ch) in integral.chars().enumerate() {
        if i > 0 && (integral.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
