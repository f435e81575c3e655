use chart_viewport::api::{ValidationMode, ViewportConfig};
use chart_viewport::core::{
    Dimensions, ExtentsInput, Margin, Origin, Point, SubChartConfig, SubChartId, SubChartSpec,
    Viewport, XAccessor, YDomain, YExtents, YPan, current_charts, reset_y_domains,
    resolve_sub_chart_configs, update_y_scales, with_y_domain,
};
use chart_viewport::render::NullSurface;
use chart_viewport::{ChartError, ChartInput, ViewportController};
use smallvec::smallvec;

const PRICE: SubChartId = SubChartId::new(1);
const VOLUME: SubChartId = SubChartId::new(2);

fn dims() -> Dimensions {
    Dimensions {
        width: 100.0,
        height: 100.0,
    }
}

fn data() -> Vec<f64> {
    (0..50u32).map(f64::from).collect()
}

fn stacked_specs() -> Vec<SubChartSpec<f64>> {
    vec![
        SubChartSpec::new(PRICE, YExtents::accessor(|v: &f64| smallvec![*v])).with_height(60.0),
        SubChartSpec::new(VOLUME, YExtents::accessor(|v: &f64| smallvec![*v * 10.0]))
            .with_origin(Origin::Fixed(Point::new(0.0, 60.0)))
            .with_height(40.0),
    ]
}

fn resolve(specs: &[SubChartSpec<f64>]) -> Vec<SubChartConfig<f64>> {
    resolve_sub_chart_configs(dims(), specs, &[])
        .expect("resolve")
        .configs
}

fn continuous(config: &SubChartConfig<f64>) -> (f64, f64) {
    config.y_domain().as_continuous().expect("continuous domain")
}

#[test]
fn y_domains_follow_the_visible_window() {
    let data = data();
    let x = XAccessor::new(|v: &f64| *v);
    let input = ExtentsInput {
        plot_data: &data[10..20],
        x_domain: (10.0, 19.0),
        x_accessor: &x,
        display_x_accessor: &x,
        full_data: &data,
    };
    let synced = update_y_scales(&resolve(&stacked_specs()), &input, None).expect("sync");

    assert_eq!(continuous(&synced[0]), (10.0, 19.0));
    assert_eq!(continuous(&synced[1]), (100.0, 190.0));
    assert_eq!(synced[1].real_y_domain, Some(YDomain::Continuous(100.0, 190.0)));
    assert_eq!(synced[1].origin, Point::new(0.0, 60.0));
}

#[test]
fn vertical_pan_only_moves_selected_pinned_charts() {
    let data = data();
    let x = XAccessor::new(|v: &f64| *v);
    let input = ExtentsInput {
        plot_data: &data[10..20],
        x_domain: (10.0, 19.0),
        x_accessor: &x,
        display_x_accessor: &x,
        full_data: &data,
    };
    let synced = update_y_scales(&resolve(&stacked_specs()), &input, None).expect("sync");
    let pinned: Vec<_> = synced
        .iter()
        .map(|config| with_y_domain(config, &YDomain::Continuous(0.0, 100.0)).expect("pin"))
        .collect();

    let pan = YPan {
        dy: 10.0,
        charts: Some(&[PRICE]),
    };
    let panned = update_y_scales(&pinned, &input, Some(pan)).expect("pan");

    let shift = 10.0 / 60.0 * 100.0;
    let (lo, hi) = continuous(&panned[0]);
    assert!((lo - shift).abs() <= 1e-9);
    assert!((hi - (100.0 + shift)).abs() <= 1e-9);
    assert_eq!(continuous(&panned[1]), (0.0, 100.0));
    assert_eq!(panned[0].real_y_domain, Some(YDomain::Continuous(10.0, 19.0)));

    let reset = reset_y_domains(&panned, None)
        .expect("reset")
        .expect("something changed");
    assert_eq!(continuous(&reset[0]), (10.0, 19.0));
    assert_eq!(continuous(&reset[1]), (100.0, 190.0));
    assert!(reset.iter().all(|config| !config.y_pan_enabled));
    assert!(reset_y_domains(&reset, None).expect("reset").is_none());
}

#[test]
fn calculator_sees_the_visible_x_domain() {
    let specs = vec![SubChartSpec::new(
        PRICE,
        YExtents::calculator(|input: &ExtentsInput<'_, f64>| {
            YDomain::Continuous(input.x_domain.0, input.x_domain.1 + input.plot_data.len() as f64)
        }),
    )];
    let data = data();
    let x = XAccessor::new(|v: &f64| *v);
    let input = ExtentsInput {
        plot_data: &data[5..15],
        x_domain: (5.0, 14.0),
        x_accessor: &x,
        display_x_accessor: &x,
        full_data: &data,
    };
    let synced = update_y_scales(&resolve(&specs), &input, None).expect("sync");
    assert_eq!(continuous(&synced[0]), (5.0, 24.0));
}

#[test]
fn panned_literal_domain_survives_until_the_literal_changes() {
    let spec = |hi: f64| {
        vec![SubChartSpec::new(PRICE, YExtents::Literal(0.0, hi)).with_y_pan_enabled(true)]
    };
    let initial = resolve(&spec(50.0));
    assert_eq!(continuous(&initial[0]), (0.0, 50.0));
    let panned = vec![with_y_domain(&initial[0], &YDomain::Continuous(10.0, 60.0)).expect("pin")];

    let same = resolve_sub_chart_configs(dims(), &spec(50.0), &panned).expect("resolve");
    assert_eq!(continuous(&same.configs[0]), (10.0, 60.0));

    let changed = resolve_sub_chart_configs(dims(), &spec(80.0), &panned).expect("resolve");
    assert_eq!(continuous(&changed.configs[0]), (0.0, 80.0));
}

#[test]
fn pointer_selects_the_chart_band_it_is_in() {
    let configs = resolve(&stacked_specs());
    assert_eq!(current_charts(&configs, Point::new(10.0, 30.0)).as_slice(), &[PRICE]);
    assert_eq!(current_charts(&configs, Point::new(10.0, 80.0)).as_slice(), &[VOLUME]);
    assert!(current_charts(&configs, Point::new(10.0, 100.0)).is_empty());
}

#[test]
fn sub_chart_without_extents_is_a_strict_error() {
    let mut spec = SubChartSpec::new(PRICE, YExtents::accessor(|v: &f64| smallvec![*v]));
    spec.y_extents = None;
    let resolved = resolve_sub_chart_configs(dims(), &[spec], &[]).expect("resolve");
    assert_eq!(resolved.missing_extents, vec![PRICE]);
    assert!(resolved.configs.is_empty());

    let input = || {
        let mut spec = SubChartSpec::new(PRICE, YExtents::accessor(|v: &f64| smallvec![*v]));
        spec.y_extents = None;
        ChartInput::new("idx", data(), XAccessor::new(|v: &f64| *v), Viewport::new(100, 100))
            .with_margin(Margin::zero())
            .with_sub_charts(vec![spec])
    };
    let strict = ViewportConfig::default().with_validation(ValidationMode::Strict);
    let err = ViewportController::new(NullSurface::raster(), strict, input())
        .err()
        .expect("strict init fails");
    assert!(matches!(err, ChartError::MissingYExtents { chart_id: 1 }));

    let lenient = ViewportConfig::default().with_validation(ValidationMode::Lenient);
    let controller =
        ViewportController::new(NullSurface::raster(), lenient, input()).expect("lenient init");
    assert!(controller.chart_configs().is_empty());
}
