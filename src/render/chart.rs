//! Pie, donut, and line charts built from path elements.

use super::style::{format_amount, GRID_GRAY, SLATE};
use crate::elements::{Color, Element, FontStyle, PathElement, TextElement};
use crate::geometry::{Point, Rect};
use std::f64::consts::{FRAC_PI_2, TAU};

/// One share of a pie or donut chart.
#[derive(Debug, Clone)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: Color,
}

impl Slice {
    pub fn new(label: impl Into<String>, value: f64, color: Color) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Pie chart; `hole` carves a white disc of that fraction of the radius
/// to make a donut. Slices start at twelve o'clock and run
/// counterclockwise.
pub fn pie_chart(center: Point, radius: f64, slices: &[Slice], hole: Option<f64>) -> Vec<Element> {
    let total: f64 = slices.iter().map(|s| s.value.abs()).sum();
    if total <= 0.0 {
        return vec![TextElement::new("No data", center.x, center.y, 10.0)
            .color(SLATE)
            .centered_on(center.x)
            .into()];
    }

    let mut elements: Vec<Element> = Vec::new();
    let mut angle = FRAC_PI_2;
    for slice in slices {
        let sweep = slice.value.abs() / total * TAU;
        elements.push(PathElement::pie_slice(center, radius, angle, sweep, slice.color).into());

        let mid = angle + sweep / 2.0;
        let label_at = Point::new(
            center.x + radius * 1.3 * mid.cos(),
            center.y + radius * 1.3 * mid.sin(),
        );
        let share = (slice.value.abs() / total * 100.0).round();
        elements.push(
            TextElement::new(format!("{} ({:.0}%)", slice.label, share), 0.0, label_at.y, 9.0)
                .centered_on(label_at.x)
                .into(),
        );
        elements.push(
            TextElement::new(format_amount(slice.value), 0.0, label_at.y - 11.0, 8.0)
                .color(SLATE)
                .centered_on(label_at.x)
                .into(),
        );
        angle += sweep;
    }

    if let Some(fraction) = hole {
        elements.push(PathElement::circle(center, radius * fraction, Color::WHITE).into());
    }
    elements
}

/// Line chart of labelled points with a dashed horizontal grid.
pub fn line_chart(rect: Rect, points: &[(String, f64)], stroke: Color) -> Vec<Element> {
    let mut elements: Vec<Element> = Vec::new();
    if points.is_empty() {
        return elements;
    }

    let mut min = points.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let mut max = points.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    min = min.min(0.0);
    if max <= min {
        max = min + 1.0;
    }

    let x_at = |i: usize| {
        let step = rect.width / (points.len().max(2) - 1) as f64;
        rect.x + step * i as f64
    };
    let y_at = |v: f64| rect.y + (v - min) / (max - min) * rect.height;

    // Dashed grid with value labels on the left.
    const TICKS: usize = 5;
    for tick in 0..TICKS {
        let value = min + (max - min) * tick as f64 / (TICKS - 1) as f64;
        let y = y_at(value);
        elements.push(
            PathElement::line(
                Point::new(rect.x, y),
                Point::new(rect.right(), y),
                GRID_GRAY,
                0.5,
            )
            .dashed(vec![2.0, 3.0], 0.0)
            .into(),
        );
        elements.push(
            TextElement::new(format_amount(value), 0.0, y - 2.5, 7.0)
                .color(SLATE)
                .right_aligned_at(rect.x - 6.0)
                .into(),
        );
    }

    // Axes.
    elements.push(
        PathElement::line(Point::new(rect.x, rect.y), Point::new(rect.x, rect.top()), SLATE, 1.0)
            .into(),
    );
    elements.push(
        PathElement::line(
            Point::new(rect.x, y_at(0.0)),
            Point::new(rect.right(), y_at(0.0)),
            SLATE,
            1.0,
        )
        .into(),
    );

    // Series with point markers and x labels.
    let series: Vec<Point> = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| Point::new(x_at(i), y_at(*v)))
        .collect();
    elements.push(PathElement::polyline(&series, stroke, 1.5).into());
    for (i, (label, v)) in points.iter().enumerate() {
        elements.push(PathElement::circle(series[i], 2.5, stroke).into());
        elements.push(
            TextElement::new(label.clone(), 0.0, rect.y - 14.0, 7.0)
                .color(SLATE)
                .centered_on(x_at(i))
                .into(),
        );
        elements.push(
            TextElement::new(format_amount(*v), 0.0, series[i].y + 6.0, 7.0)
                .centered_on(series[i].x)
                .font(FontStyle::Oblique)
                .into(),
        );
    }
    elements
}
