//! Vector path element.

use super::Color;
use crate::geometry::{Point, Rect};

/// Bezier approximation constant for a quarter circle.
const CIRCLE_K: f64 = 0.552_284_8;

/// Path construction operators, mirroring the PDF path model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
    /// Cubic Bezier: two control points then the end point
    CurveTo(Point, Point, Point),
    Rect(Rect),
    Close,
}

/// How a finished path is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    Stroke,
    Fill,
    FillStroke,
}

/// A paintable vector path.
#[derive(Debug, Clone)]
pub struct PathElement {
    pub ops: Vec<PathOp>,
    pub mode: PaintMode,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    /// Dash pattern and phase; `None` paints solid
    pub dash: Option<(Vec<f64>, f64)>,
}

impl PathElement {
    fn stroked(ops: Vec<PathOp>, color: Color, width: f64) -> Self {
        Self {
            ops,
            mode: PaintMode::Stroke,
            stroke_color: color,
            fill_color: Color::BLACK,
            line_width: width,
            dash: None,
        }
    }

    fn filled(ops: Vec<PathOp>, color: Color) -> Self {
        Self {
            ops,
            mode: PaintMode::Fill,
            stroke_color: Color::BLACK,
            fill_color: color,
            line_width: 1.0,
            dash: None,
        }
    }

    /// Straight stroked segment.
    pub fn line(from: Point, to: Point, color: Color, width: f64) -> Self {
        Self::stroked(vec![PathOp::MoveTo(from), PathOp::LineTo(to)], color, width)
    }

    /// Stroked open polyline through `points`.
    pub fn polyline(points: &[Point], color: Color, width: f64) -> Self {
        let mut ops = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                ops.push(PathOp::MoveTo(*p));
            } else {
                ops.push(PathOp::LineTo(*p));
            }
        }
        Self::stroked(ops, color, width)
    }

    /// Rectangle, filled and/or stroked depending on which colors are given.
    pub fn rect(rect: Rect, fill: Option<Color>, stroke: Option<(Color, f64)>) -> Self {
        let ops = vec![PathOp::Rect(rect)];
        match (fill, stroke) {
            (Some(fill_color), Some((stroke_color, width))) => Self {
                ops,
                mode: PaintMode::FillStroke,
                stroke_color,
                fill_color,
                line_width: width,
                dash: None,
            },
            (Some(fill_color), None) => Self::filled(ops, fill_color),
            (None, Some((stroke_color, width))) => Self::stroked(ops, stroke_color, width),
            (None, None) => Self::stroked(ops, Color::BLACK, 1.0),
        }
    }

    /// Filled circle built from four Bezier quadrants.
    pub fn circle(center: Point, radius: f64, fill: Color) -> Self {
        let k = CIRCLE_K * radius;
        let (cx, cy) = (center.x, center.y);
        let ops = vec![
            PathOp::MoveTo(Point::new(cx + radius, cy)),
            PathOp::CurveTo(
                Point::new(cx + radius, cy + k),
                Point::new(cx + k, cy + radius),
                Point::new(cx, cy + radius),
            ),
            PathOp::CurveTo(
                Point::new(cx - k, cy + radius),
                Point::new(cx - radius, cy + k),
                Point::new(cx - radius, cy),
            ),
            PathOp::CurveTo(
                Point::new(cx - radius, cy - k),
                Point::new(cx - k, cy - radius),
                Point::new(cx, cy - radius),
            ),
            PathOp::CurveTo(
                Point::new(cx + k, cy - radius),
                Point::new(cx + radius, cy - k),
                Point::new(cx + radius, cy),
            ),
            PathOp::Close,
        ];
        Self::filled(ops, fill)
    }

    /// Filled pie slice from `start_angle` sweeping counterclockwise by
    /// `sweep` radians.
    ///
    /// The arc is split into segments of at most a quarter turn, each
    /// approximated by one cubic with control distance `4/3 * tan(t/4)`.
    pub fn pie_slice(center: Point, radius: f64, start_angle: f64, sweep: f64, fill: Color) -> Self {
        let point_at = |angle: f64| {
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        };

        let mut ops = vec![PathOp::MoveTo(center), PathOp::LineTo(point_at(start_angle))];

        let segments = (sweep.abs() / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f64;
        for i in 0..segments {
            let a0 = start_angle + step * i as f64;
            let a1 = a0 + step;
            let k = 4.0 / 3.0 * (step / 4.0).tan() * radius;
            let p0 = point_at(a0);
            let p3 = point_at(a1);
            let c1 = Point::new(p0.x - k * a0.sin(), p0.y + k * a0.cos());
            let c2 = Point::new(p3.x + k * a1.sin(), p3.y - k * a1.cos());
            ops.push(PathOp::CurveTo(c1, c2, p3));
        }
        ops.push(PathOp::Close);

        Self::filled(ops, fill)
    }

    /// Switch to a dashed stroke.
    pub fn dashed(mut self, pattern: Vec<f64>, phase: f64) -> Self {
        self.dash = Some((pattern, phase));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ops() {
        let line = PathElement::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0), Color::BLACK, 2.0);
        assert_eq!(line.ops.len(), 2);
        assert_eq!(line.mode, PaintMode::Stroke);
        assert_eq!(line.line_width, 2.0);
    }

    #[test]
    fn test_polyline_ops() {
        let points = [Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)];
        let path = PathElement::polyline(&points, Color::BLACK, 1.0);
        assert!(matches!(path.ops[0], PathOp::MoveTo(_)));
        assert!(matches!(path.ops[1], PathOp::LineTo(_)));
        assert_eq!(path.ops.len(), 3);
    }

    #[test]
    fn test_circle_is_closed_fill() {
        let circle = PathElement::circle(Point::new(5.0, 5.0), 2.0, Color::WHITE);
        assert_eq!(circle.mode, PaintMode::Fill);
        assert!(matches!(circle.ops.last(), Some(PathOp::Close)));
    }

    #[test]
    fn test_pie_slice_segment_count() {
        // A half turn needs two quarter-turn segments.
        let slice = PathElement::pie_slice(
            Point::new(0.0, 0.0),
            10.0,
            0.0,
            std::f64::consts::PI,
            Color::WHITE,
        );
        let curves = slice
            .ops
            .iter()
            .filter(|op| matches!(op, PathOp::CurveTo(..)))
            .count();
        assert_eq!(curves, 2);
    }

    #[test]
    fn test_pie_slice_endpoints_on_circle() {
        let slice = PathElement::pie_slice(
            Point::new(0.0, 0.0),
            10.0,
            std::f64::consts::FRAC_PI_2,
            1.1,
            Color::WHITE,
        );
        for op in &slice.ops {
            if let PathOp::CurveTo(_, _, end) = op {
                let r = (end.x * end.x + end.y * end.y).sqrt();
                assert!((r - 10.0).abs() < 1e-9);
            }
        }
    }
}
