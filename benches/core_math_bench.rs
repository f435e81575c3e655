use chart_viewport::api::{ValidationMode, ViewportConfig};
use chart_viewport::core::{
    DataFilter, Dimensions, ExtentsInput, FilterHints, LinearScale, Margin, Ohlcv, Point, Scale,
    SubChartId, SubChartSpec, Viewport, XAccessor, XExtents, YExtents, resolve_sub_chart_configs,
    update_y_scales,
};
use chart_viewport::interaction::{InputEvent, PointerButton};
use chart_viewport::render::NullSurface;
use chart_viewport::{ChartInput, ViewportController};
use criterion::{Criterion, criterion_group, criterion_main};
use smallvec::smallvec;
use std::hint::black_box;

fn bars(count: usize) -> Vec<Ohlcv> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let base = 100.0 + t * 0.05;
            let open = base;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            let low = open.min(close) - 0.75;
            let high = open.max(close) + 0.75;
            Ohlcv::new(t, open, high, low, close, 1_000.0 + t).expect("valid generated bar")
        })
        .collect()
}

fn price_extents() -> YExtents<Ohlcv> {
    YExtents::accessor(|bar: &Ohlcv| smallvec![bar.high, bar.low])
}

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::new((0.0, 10_000.0), (0.0, 1_920.0)).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.map(black_box(4_321.123));
            let _ = scale.invert(px);
        })
    });
}

fn bench_filter_100k(c: &mut Criterion) {
    let data = bars(100_000);
    let x = XAccessor::new(|bar: &Ohlcv| bar.x);
    let scale = Scale::Linear(LinearScale::new((0.0, 1.0), (0.0, 1_600.0)).expect("valid scale"));
    let filter = DataFilter::default();

    c.bench_function("filter_window_100k", |b| {
        b.iter(|| {
            let _ = filter
                .filter(
                    black_box(&data),
                    black_box((60_000.0, 61_500.0)),
                    &x,
                    &scale,
                    &FilterHints::default(),
                )
                .expect("filter should succeed");
        })
    });
}

fn bench_y_extents_3k_window(c: &mut Criterion) {
    let data = bars(10_000);
    let x = XAccessor::new(|bar: &Ohlcv| bar.x);
    let specs = vec![SubChartSpec::new(SubChartId::new(1), price_extents())];
    let dims = Dimensions {
        width: 1_600.0,
        height: 900.0,
    };
    let configs = resolve_sub_chart_configs(dims, &specs, &[])
        .expect("resolve")
        .configs;
    let input = ExtentsInput {
        plot_data: &data[5_000..8_000],
        x_domain: (5_000.0, 7_999.0),
        x_accessor: &x,
        display_x_accessor: &x,
        full_data: &data,
    };

    c.bench_function("y_extents_3k_window", |b| {
        b.iter(|| {
            let _ = update_y_scales(black_box(&configs), &input, None).expect("sync");
        })
    });
}

fn bench_pan_frame_10k(c: &mut Criterion) {
    let input = ChartInput::new(
        "bars",
        bars(10_000),
        XAccessor::new(|bar: &Ohlcv| bar.x),
        Viewport::new(1_600, 900),
    )
    .with_margin(Margin::zero())
    .with_x_extents(XExtents::literal(8_000.0, 9_999.0))
    .with_sub_charts(vec![SubChartSpec::new(SubChartId::new(1), price_extents())]);
    let config = ViewportConfig::default().with_validation(ValidationMode::Strict);
    let mut controller =
        ViewportController::new(NullSurface::raster(), config, input).expect("controller init");
    controller
        .handle_input(
            &InputEvent::MouseDown {
                position: Point::new(800.0, 450.0),
                button: PointerButton::Primary,
            },
            0.0,
        )
        .expect("mouse down");

    let mut dx = 0.0;
    c.bench_function("pan_frame_10k", |b| {
        b.iter(|| {
            dx = (dx + 7.0) % 400.0;
            controller
                .handle_input(
                    &InputEvent::MouseMove {
                        position: Point::new(800.0 + dx, 450.0),
                    },
                    0.0,
                )
                .expect("mouse move");
            controller.on_animation_frame().expect("frame");
            controller.surface_mut().take_cleared();
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_filter_100k,
    bench_y_extents_3k_window,
    bench_pan_frame_10k
);
criterion_main!(benches);
