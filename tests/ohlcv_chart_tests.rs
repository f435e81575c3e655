use chart_viewport::api::{ValidationMode, ViewportConfig};
use chart_viewport::core::{
    Margin, Ohlcv, Origin, Point, SubChartId, SubChartSpec, ValueAccessor, Viewport, XAccessor,
    XExtents, YDomain, YExtentSource, YExtents,
};
use chart_viewport::render::NullSurface;
use chart_viewport::{ChartInput, ViewportController};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use smallvec::smallvec;

const PRICE: SubChartId = SubChartId::new(1);
const VOLUME: SubChartId = SubChartId::new(2);

fn daily_bars(count: i64) -> Vec<Ohlcv> {
    let start = Utc
        .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
        .single()
        .expect("valid time");
    (0..count)
        .map(|i| {
            Ohlcv::from_decimal_time(
                start + Duration::days(i),
                Decimal::new(1_000 + 100 * i, 2),
                Decimal::new(1_100 + 100 * i, 2),
                Decimal::new(950 + 100 * i, 2),
                Decimal::new(1_050 + 100 * i, 2),
                Decimal::new(100 + i, 0),
            )
            .expect("valid quote")
            .with_index(i as usize)
        })
        .collect()
}

fn input() -> ChartInput<Ohlcv> {
    ChartInput::new(
        "daily",
        daily_bars(30),
        XAccessor::new(|bar: &Ohlcv| bar.x),
        Viewport::new(100, 100),
    )
    .with_margin(Margin::zero())
    .with_x_extents(XExtents::function(|bars: &[Ohlcv]| {
        (bars[bars.len() - 10].x, bars[bars.len() - 1].x)
    }))
    .with_sub_charts(vec![
        SubChartSpec::new(
            PRICE,
            YExtents::accessor(|bar: &Ohlcv| smallvec![bar.high, bar.low]),
        )
        .with_height(70.0),
        SubChartSpec::new(
            VOLUME,
            YExtents::Values(vec![
                YExtentSource::Accessor(ValueAccessor::single(|bar: &Ohlcv| bar.volume)),
                YExtentSource::Literal(0.0),
            ]),
        )
        .with_origin(Origin::Fixed(Point::new(0.0, 70.0)))
        .with_height(30.0),
    ])
}

#[test]
fn index_keyed_bars_show_the_last_ten_sessions() {
    let controller = ViewportController::new(
        NullSurface::raster(),
        ViewportConfig::default().with_validation(ValidationMode::Strict),
        input(),
    )
    .expect("controller init");

    assert_eq!(controller.x_domain(), (20.0, 29.0));
    assert_eq!(controller.visible_range(), 20..30);

    let price = controller.chart_config(PRICE).expect("price chart");
    assert_eq!(price.y_domain(), YDomain::Continuous(29.5, 40.0));
    let volume = controller.chart_config(VOLUME).expect("volume chart");
    assert_eq!(volume.y_domain(), YDomain::Continuous(0.0, 129.0));
    assert_eq!(volume.origin, Point::new(0.0, 70.0));
}

#[test]
fn x_axis_zoom_refreshes_both_sub_charts() {
    let mut controller = ViewportController::new(
        NullSurface::raster(),
        ViewportConfig::default().with_validation(ValidationMode::Strict),
        input(),
    )
    .expect("controller init");

    controller.x_axis_zoom((0.0, 9.0)).expect("axis zoom");
    assert_eq!(controller.visible_range(), 0..10);
    assert_eq!(
        controller.chart_config(PRICE).expect("price").y_domain(),
        YDomain::Continuous(9.5, 20.0)
    );
    assert_eq!(
        controller.chart_config(VOLUME).expect("volume").y_domain(),
        YDomain::Continuous(0.0, 109.0)
    );
}
