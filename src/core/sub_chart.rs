use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::extents::{YDomain, YExtents};
use crate::core::scale::{LinearScale, OrdinalScale, Scale, ScaleKind};
use crate::core::types::{Dimensions, Point, YPadding};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubChartId(u32);

impl SubChartId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Sub-chart pixel origin relative to the plot area.
#[derive(Clone)]
pub enum Origin {
    Fixed(Point),
    /// Computed from `(plot_width, plot_height)`.
    Computed(Arc<dyn Fn(f64, f64) -> Point + Send + Sync>),
}

impl Origin {
    pub fn computed(f: impl Fn(f64, f64) -> Point + Send + Sync + 'static) -> Self {
        Self::Computed(Arc::new(f))
    }

    #[must_use]
    pub fn resolve(&self, width: f64, height: f64) -> Point {
        match self {
            Self::Fixed(point) => *point,
            Self::Computed(f) => f(width, height),
        }
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::Fixed(Point::default())
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(point) => write!(f, "Origin::Fixed({}, {})", point.x, point.y),
            Self::Computed(_) => f.write_str("Origin::Computed"),
        }
    }
}

/// Host declaration of one stacked sub-chart.
pub struct SubChartSpec<T> {
    pub id: SubChartId,
    pub origin: Origin,
    /// Defaults to the full plot height.
    pub height: Option<f64>,
    pub padding: YPadding,
    pub y_extents: Option<YExtents<T>>,
    pub y_scale_kind: ScaleKind,
    pub flip_y_scale: bool,
    /// Whether the y axis may be dragged at all.
    pub y_pan: bool,
    pub y_pan_enabled: bool,
}

impl<T> SubChartSpec<T> {
    #[must_use]
    pub fn new(id: SubChartId, y_extents: YExtents<T>) -> Self {
        Self {
            id,
            origin: Origin::default(),
            height: None,
            padding: YPadding::default(),
            y_extents: Some(y_extents),
            y_scale_kind: ScaleKind::Linear,
            flip_y_scale: false,
            y_pan: true,
            y_pan_enabled: false,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: YPadding) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_y_scale_kind(mut self, kind: ScaleKind) -> Self {
        self.y_scale_kind = kind;
        self
    }

    #[must_use]
    pub fn with_flip_y_scale(mut self, flip: bool) -> Self {
        self.flip_y_scale = flip;
        self
    }

    #[must_use]
    pub fn with_y_pan(mut self, y_pan: bool) -> Self {
        self.y_pan = y_pan;
        self
    }

    #[must_use]
    pub fn with_y_pan_enabled(mut self, enabled: bool) -> Self {
        self.y_pan_enabled = enabled;
        self
    }
}

impl<T> Clone for SubChartSpec<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            origin: self.origin.clone(),
            height: self.height,
            padding: self.padding,
            y_extents: self.y_extents.clone(),
            y_scale_kind: self.y_scale_kind,
            flip_y_scale: self.flip_y_scale,
            y_pan: self.y_pan,
            y_pan_enabled: self.y_pan_enabled,
        }
    }
}

impl<T> fmt::Debug for SubChartSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubChartSpec")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("height", &self.height)
            .field("y_extents", &self.y_extents)
            .field("y_scale_kind", &self.y_scale_kind)
            .finish_non_exhaustive()
    }
}

/// Resolved sub-chart: pixel placement plus its current y scale.
pub struct SubChartConfig<T> {
    pub id: SubChartId,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub padding: YPadding,
    pub y_extents: YExtents<T>,
    /// Literal pair the host declared, if any.
    pub original_literal: Option<(f64, f64)>,
    pub flip_y_scale: bool,
    pub y_pan: bool,
    pub y_pan_enabled: bool,
    pub y_scale: Scale,
    /// Data-derived domain from the last synchronization.
    pub real_y_domain: Option<YDomain>,
}

impl<T> SubChartConfig<T> {
    /// Whether a pointer at plot-area `y` lies strictly inside the band.
    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y > self.origin.y && y < self.origin.y + self.height
    }

    #[must_use]
    pub fn y_domain(&self) -> YDomain {
        scale_domain(&self.y_scale)
    }

    /// Rebuilds the y scale over `domain` with this chart's range rules.
    pub fn rescaled(&self, domain: &YDomain) -> ChartResult<Scale> {
        build_y_scale(
            self.y_scale.kind(),
            domain,
            self.height,
            self.padding,
            self.flip_y_scale,
        )
    }
}

impl<T> Clone for SubChartConfig<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            origin: self.origin,
            width: self.width,
            height: self.height,
            padding: self.padding,
            y_extents: self.y_extents.clone(),
            original_literal: self.original_literal,
            flip_y_scale: self.flip_y_scale,
            y_pan: self.y_pan,
            y_pan_enabled: self.y_pan_enabled,
            y_scale: self.y_scale.clone(),
            real_y_domain: self.real_y_domain.clone(),
        }
    }
}

impl<T> fmt::Debug for SubChartConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubChartConfig")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("y_scale", &self.y_scale)
            .field("y_pan_enabled", &self.y_pan_enabled)
            .finish_non_exhaustive()
    }
}

/// Resolved configs plus the ids that declared no y extents.
#[derive(Debug)]
pub struct ResolvedSubCharts<T> {
    pub configs: Vec<SubChartConfig<T>>,
    pub missing_extents: Vec<SubChartId>,
}

/// Resolves declarations against the plot area.
///
/// With `existing` configs, a sub-chart the user panned vertically keeps its
/// domain: literal extents keep it only while the literal is unchanged and
/// panning stays allowed, data-driven extents always carry it forward.
pub fn resolve_sub_chart_configs<T>(
    dims: Dimensions,
    specs: &[SubChartSpec<T>],
    existing: &[SubChartConfig<T>],
) -> ChartResult<ResolvedSubCharts<T>> {
    let mut configs = Vec::with_capacity(specs.len());
    let mut missing_extents = Vec::new();

    for spec in specs {
        let Some(y_extents) = spec.y_extents.clone() else {
            missing_extents.push(spec.id);
            continue;
        };
        let height = spec.height.unwrap_or(dims.height);
        if !height.is_finite() || height <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "sub-chart {} height must be finite and > 0",
                spec.id.raw()
            )));
        }
        let origin = spec.origin.resolve(dims.width, dims.height);
        let literal = y_extents.literal();
        let previous = existing.iter().find(|config| config.id == spec.id);
        let mut y_pan_enabled = spec.y_pan_enabled;

        let domain = match (literal, previous) {
            (Some(literal), Some(previous))
                if previous.y_pan
                    && previous.y_pan_enabled
                    && spec.y_pan
                    && spec.y_pan_enabled
                    && previous.original_literal == Some(literal) =>
            {
                previous.y_domain()
            }
            (Some((lo, hi)), _) => YDomain::Continuous(lo, hi),
            (None, Some(previous))
                if previous.y_pan_enabled && previous.original_literal.is_none() =>
            {
                y_pan_enabled = true;
                previous.y_domain()
            }
            (None, _) => YDomain::Continuous(0.0, 1.0),
        };

        let y_scale = build_y_scale(
            spec.y_scale_kind,
            &domain,
            height,
            spec.padding,
            spec.flip_y_scale,
        )?;
        configs.push(SubChartConfig {
            id: spec.id,
            origin,
            width: dims.width,
            height,
            padding: spec.padding,
            y_extents,
            original_literal: literal,
            flip_y_scale: spec.flip_y_scale,
            y_pan: spec.y_pan,
            y_pan_enabled,
            y_scale,
            real_y_domain: previous.and_then(|previous| previous.real_y_domain.clone()),
        });
    }

    Ok(ResolvedSubCharts {
        configs,
        missing_extents,
    })
}

/// Builds a y scale: continuous ranges run bottom-up unless flipped,
/// ordinal ranges need symmetric padding.
pub fn build_y_scale(
    kind: ScaleKind,
    domain: &YDomain,
    height: f64,
    padding: YPadding,
    flip: bool,
) -> ChartResult<Scale> {
    match kind {
        ScaleKind::Linear => {
            let (top, bottom) = padding.sides();
            let range = if flip {
                (top, height - bottom)
            } else {
                (height - bottom, top)
            };
            let domain = match domain {
                YDomain::Continuous(lo, hi) => (*lo, *hi),
                YDomain::Discrete(values) => values
                    .iter()
                    .fold(None, |acc: Option<(f64, f64)>, value| match acc {
                        None => Some((*value, *value)),
                        Some((lo, hi)) => Some((lo.min(*value), hi.max(*value))),
                    })
                    .unwrap_or((0.0, 1.0)),
            };
            LinearScale::new(domain, range).map(Scale::Linear)
        }
        ScaleKind::Ordinal => {
            let Some(padding) = padding.symmetric() else {
                return Err(ChartError::InvalidConfig(
                    "padding has to be a number for ordinal scale".to_owned(),
                ));
            };
            let range = if flip { (0.0, height) } else { (height, 0.0) };
            let values: Vec<f64> = match domain {
                YDomain::Continuous(lo, hi) => vec![*lo, *hi],
                YDomain::Discrete(values) => values.clone(),
            };
            OrdinalScale::new(values, range, padding).map(Scale::Ordinal)
        }
    }
}

#[must_use]
pub fn scale_domain(scale: &Scale) -> YDomain {
    match scale {
        Scale::Linear(scale) => {
            let (lo, hi) = scale.domain();
            YDomain::Continuous(lo, hi)
        }
        Scale::Ordinal(scale) => YDomain::Discrete(scale.values().collect()),
    }
}

/// Ids of sub-charts whose vertical band contains the pointer.
#[must_use]
pub fn current_charts<T>(configs: &[SubChartConfig<T>], mouse: Point) -> SmallVec<[SubChartId; 4]> {
    configs
        .iter()
        .filter(|config| config.contains_y(mouse.y))
        .map(|config| config.id)
        .collect()
}
