pub mod evaluator;
pub mod extents;
pub mod primitives;
pub mod scale;
pub mod scale_sync;
pub mod sub_chart;
pub mod types;
pub mod windowing;

pub use evaluator::{
    ClampFn, ClampMode, DataFilter, FallbackEnd, FilterHints, FilterOutcome, FilterSettings,
    Filtered, TruncationPolicy, VisibleWindow,
};
pub use extents::{ExtentsInput, XExtentValue, XExtents, YDomain, YExtentSource, YExtents};
pub use primitives::Ohlcv;
pub use scale::{LinearScale, OrdinalScale, Scale, ScaleKind};
pub use scale_sync::{YPan, reset_y_domains, update_y_scales, with_y_domain};
pub use sub_chart::{
    Origin, ResolvedSubCharts, SubChartConfig, SubChartId, SubChartSpec, current_charts,
    resolve_sub_chart_configs,
};
pub use types::{Dimensions, Margin, Point, ValueAccessor, Viewport, XAccessor, XPadding, YPadding};
