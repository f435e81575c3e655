//! Pure domain arithmetic behind pan, zoom, pinch and axis drag.

use crate::core::{LinearScale, Point};
use crate::error::ChartResult;

/// Domain after dragging the plot by `dx` pixels, relative to the scale the
/// gesture started with.
pub fn pan_domain(start_scale: LinearScale, dx: f64) -> ChartResult<(f64, f64)> {
    let (r0, r1) = start_scale.range();
    start_scale.invert_range((r0 - dx, r1 - dx))
}

/// Domain after stretching the range by `factor` around `anchor_value`.
///
/// `factor > 1` zooms out.
pub fn zoom_domain(scale: LinearScale, anchor_value: f64, factor: f64) -> ChartResult<(f64, f64)> {
    let cx = scale.map(anchor_value);
    let (r0, r1) = scale.range();
    scale.invert_range((cx + (r0 - cx) * factor, cx + (r1 - cx) * factor))
}

/// Domain that keeps the content under both fingers underneath them.
///
/// Solves `final = a * initial + b` along x from the two touch pairs and
/// maps the range edges back through the inverse. Returns `None` for a
/// degenerate or mirroring pinch.
pub fn pinch_domain(
    start_scale: LinearScale,
    initial: (Point, Point),
    current: (Point, Point),
) -> ChartResult<Option<(f64, f64)>> {
    let (i1, i2) = (initial.0.x, initial.1.x);
    let (f1, f2) = (current.0.x, current.1.x);
    if (i2 - i1).abs() < f64::EPSILON {
        return Ok(None);
    }
    let a = (f2 - f1) / (i2 - i1);
    let b = f1 - a * i1;
    if !a.is_finite() || !b.is_finite() || a <= 0.0 {
        return Ok(None);
    }
    let (r0, r1) = start_scale.range();
    start_scale
        .invert_range(((r0 - b) / a, (r1 - b) / a))
        .map(Some)
}

/// Domain for dragging an axis by `diff` pixels.
///
/// The range grows (or shrinks when `inverted`) symmetrically about its
/// centre. Results that would flip the axis direction are rejected.
pub fn axis_drag_domain(
    start_scale: LinearScale,
    diff: f64,
    inverted: bool,
) -> ChartResult<Option<(f64, f64)>> {
    let (r0, r1) = start_scale.range();
    let center = (r0 + r1) / 2.0;
    let stretch = |d: f64| {
        if inverted {
            d - sign(d - center) * diff
        } else {
            d + sign(d - center) * diff
        }
    };
    let temp = (stretch(r0), stretch(r1));
    if sign(r1 - r0) != sign(temp.1 - temp.0) {
        return Ok(None);
    }
    start_scale.invert_range(temp).map(Some)
}

/// `(domain_start, first_item_x)` when the domain starts before the data.
#[must_use]
pub fn load_more_range(domain_start: f64, first_item_x: f64) -> Option<(f64, f64)> {
    (domain_start < first_item_x).then_some((domain_start, first_item_x))
}

fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{axis_drag_domain, load_more_range, pan_domain, pinch_domain, zoom_domain};
    use crate::core::{LinearScale, Point};

    fn scale() -> LinearScale {
        LinearScale::new((150.0, 199.0), (0.0, 100.0)).expect("scale")
    }

    #[test]
    fn dragging_right_moves_domain_left() {
        let (start, end) = pan_domain(scale(), 60.0).expect("pan");
        assert_relative_eq!(start, 150.0 - 60.0 * 0.49, epsilon = 1e-9);
        assert_relative_eq!(end, 199.0 - 60.0 * 0.49, epsilon = 1e-9);
    }

    #[test]
    fn zoom_keeps_anchor_pixel() {
        let domain = zoom_domain(scale(), 174.5, 2.0).expect("zoom");
        assert_relative_eq!(domain.0, 125.5, epsilon = 1e-9);
        assert_relative_eq!(domain.1, 223.5, epsilon = 1e-9);
        let zoomed = scale().with_domain(domain).expect("scale");
        assert_relative_eq!(zoomed.map(174.5), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn spreading_fingers_zooms_in_around_them() {
        let initial = (Point::new(40.0, 0.0), Point::new(60.0, 0.0));
        let current = (Point::new(30.0, 0.0), Point::new(70.0, 0.0));
        let (start, end) = pinch_domain(scale(), initial, current)
            .expect("pinch")
            .expect("non-degenerate");
        // a = 2, b = -50: the visible range covers initial pixels 25..75.
        assert_relative_eq!(start, 150.0 + 25.0 * 0.49, epsilon = 1e-9);
        assert_relative_eq!(end, 150.0 + 75.0 * 0.49, epsilon = 1e-9);
    }

    #[test]
    fn crossed_or_stacked_fingers_are_ignored() {
        let stacked = (Point::new(40.0, 0.0), Point::new(40.0, 10.0));
        assert!(
            pinch_domain(scale(), stacked, stacked)
                .expect("pinch")
                .is_none()
        );
        let initial = (Point::new(40.0, 0.0), Point::new(60.0, 0.0));
        let crossed = (Point::new(60.0, 0.0), Point::new(40.0, 0.0));
        assert!(
            pinch_domain(scale(), initial, crossed)
                .expect("pinch")
                .is_none()
        );
    }

    #[test]
    fn axis_drag_rejects_direction_flip() {
        let widened = axis_drag_domain(scale(), 10.0, false)
            .expect("drag")
            .expect("valid");
        assert!(widened.0 < 150.0 && widened.1 > 199.0);
        assert!(axis_drag_domain(scale(), 60.0, true).expect("drag").is_none());
    }

    #[test]
    fn load_more_only_before_first_item() {
        assert_eq!(load_more_range(-20.0, 0.0), Some((-20.0, 0.0)));
        assert_eq!(load_more_range(0.0, 0.0), None);
    }
}
