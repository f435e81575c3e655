use chart_viewport::api::gesture_reducers::{pan_domain, zoom_domain};
use chart_viewport::api::{ValidationMode, ViewportConfig};
use chart_viewport::core::evaluator::show_max_threshold;
use chart_viewport::core::windowing::find_unsorted_index;
use chart_viewport::core::{
    DataFilter, FilterHints, LinearScale, Margin, Point, Scale, Viewport, XAccessor, XExtents,
};
use chart_viewport::interaction::{InputEvent, PointerButton};
use chart_viewport::render::NullSurface;
use chart_viewport::{ChartInput, ViewportController};
use proptest::prelude::*;

fn identity() -> XAccessor<f64> {
    XAccessor::new(|v: &f64| *v)
}

fn series(len: u32) -> Vec<f64> {
    (0..len).map(f64::from).collect()
}

proptest! {
    #[test]
    fn pan_round_trip_restores_domain(
        start in -1_000_000.0f64..1_000_000.0,
        span in 0.01f64..100_000.0,
        width in 10.0f64..4_000.0,
        dx in -5_000.0f64..5_000.0
    ) {
        let scale = LinearScale::new((start, start + span), (0.0, width)).expect("scale");
        let panned = scale.with_domain(pan_domain(scale, dx).expect("pan")).expect("scale");
        let (back0, back1) = pan_domain(panned, -dx).expect("pan back");

        let tolerance = span * 1e-6 + start.abs() * 1e-12;
        prop_assert!((back0 - start).abs() <= tolerance);
        prop_assert!((back1 - (start + span)).abs() <= tolerance);
    }

    #[test]
    fn zoom_keeps_anchor_pixel_and_inverts(
        start in -10_000.0f64..10_000.0,
        span in 1.0f64..10_000.0,
        anchor_factor in 0.0f64..1.0,
        multiplier in 1.01f64..3.0
    ) {
        let scale = LinearScale::new((start, start + span), (0.0, 800.0)).expect("scale");
        let anchor = start + anchor_factor * span;

        let zoomed = scale
            .with_domain(zoom_domain(scale, anchor, 1.0 / multiplier).expect("zoom in"))
            .expect("scale");
        prop_assert!((zoomed.map(anchor) - scale.map(anchor)).abs() <= 1e-6);

        let (back0, back1) = zoom_domain(zoomed, anchor, multiplier).expect("zoom out");
        prop_assert!((back0 - start).abs() <= span * 1e-9 + 1e-9);
        prop_assert!((back1 - (start + span)).abs() <= span * 1e-9 + 1e-9);
    }

    #[test]
    fn density_gate_never_exceeds_max_points(
        len in 2u32..5_000,
        start in -100.0f64..5_000.0,
        span in 0.5f64..6_000.0
    ) {
        let data = series(len);
        let scale = Scale::Linear(LinearScale::new((0.0, 1.0), (0.0, 500.0)).expect("scale"));
        let filtered = DataFilter::default()
            .filter(&data, (start, start + span), &identity(), &scale, &FilterHints::default())
            .expect("filter");

        prop_assert!(filtered.window.len() < show_max_threshold(500.0, 2.0));
        prop_assert!(filtered.window.range.end <= data.len());
    }

    #[test]
    fn filtering_its_own_output_is_stable(
        len in 2u32..3_000,
        start in 0.0f64..2_000.0,
        span in 1.0f64..3_000.0
    ) {
        let data = series(len);
        let x = identity();
        let scale = Scale::Linear(LinearScale::new((0.0, 1.0), (0.0, 500.0)).expect("scale"));
        let filter = DataFilter::default();
        let first = filter
            .filter(&data, (start, start + span), &x, &scale, &FilterHints::default())
            .expect("filter");
        prop_assume!(first.window.len() >= 2);

        let second = filter
            .filter(&data, first.window.domain, &x, &scale, &FilterHints::default())
            .expect("refilter");
        prop_assert_eq!(second.window, first.window);
    }

    #[test]
    fn unsorted_pair_is_reported_at_its_second_index(
        len in 3u32..500,
        swap_factor in 0.0f64..1.0
    ) {
        let mut data = series(len);
        prop_assert_eq!(find_unsorted_index(&data, &identity()), None);

        let index = ((f64::from(len - 2)) * swap_factor) as usize;
        data.swap(index, index + 1);
        prop_assert_eq!(find_unsorted_index(&data, &identity()), Some(index + 1));
    }

    #[test]
    fn dragging_back_to_origin_restores_the_view(dx in -40.0f64..40.0) {
        let input = ChartInput::new("idx", series(200), identity(), Viewport::new(100, 100))
            .with_margin(Margin::zero())
            .with_x_extents(XExtents::literal(150.0, 199.0));
        let config = ViewportConfig::default().with_validation(ValidationMode::Strict);
        let mut controller =
            ViewportController::new(NullSurface::raster(), config, input).expect("init");

        controller
            .handle_input(
                &InputEvent::MouseDown {
                    position: Point::new(50.0, 50.0),
                    button: PointerButton::Primary,
                },
                0.0,
            )
            .expect("down");
        controller
            .handle_input(&InputEvent::MouseMove { position: Point::new(50.0 + dx, 50.0) }, 0.0)
            .expect("move");
        controller.on_animation_frame().expect("frame");
        controller
            .handle_input(&InputEvent::MouseMove { position: Point::new(50.0, 50.0) }, 0.0)
            .expect("move back");
        controller.on_animation_frame().expect("frame");

        prop_assert_eq!(controller.x_domain(), (150.0, 199.0));
        prop_assert_eq!(controller.visible_range(), 150..200);
    }
}
