use std::fmt;
use std::sync::Arc;

use crate::core::{Margin, SubChartSpec, Viewport, XAccessor, XExtents};

/// Host-provided inputs of one viewport.
///
/// The dataset and the sub-chart declarations are shared slices: a new
/// allocation is a change, a clone of the same `Arc` is not.
pub struct ChartInput<T> {
    pub data: Arc<[T]>,
    /// Identity of the series; changing it resets the viewport.
    pub series_key: String,
    pub x_accessor: XAccessor<T>,
    pub display_x_accessor: Option<XAccessor<T>>,
    pub x_extents: XExtents<T>,
    pub viewport: Viewport,
    pub margin: Margin,
    pub sub_charts: Arc<[SubChartSpec<T>]>,
}

impl<T> ChartInput<T> {
    #[must_use]
    pub fn new(
        series_key: impl Into<String>,
        data: impl Into<Arc<[T]>>,
        x_accessor: XAccessor<T>,
        viewport: Viewport,
    ) -> Self {
        Self {
            data: data.into(),
            series_key: series_key.into(),
            x_accessor,
            display_x_accessor: None,
            x_extents: XExtents::Data,
            viewport,
            margin: Margin::default(),
            sub_charts: Arc::from(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_display_x_accessor(mut self, accessor: XAccessor<T>) -> Self {
        self.display_x_accessor = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_x_extents(mut self, extents: XExtents<T>) -> Self {
        self.x_extents = extents;
        self
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_sub_charts(mut self, specs: Vec<SubChartSpec<T>>) -> Self {
        self.sub_charts = Arc::from(specs);
        self
    }

    /// Same series with a new dataset, e.g. after appending bars.
    #[must_use]
    pub fn with_data(&self, data: impl Into<Arc<[T]>>) -> Self {
        Self {
            data: data.into(),
            ..self.clone()
        }
    }

    /// Same inputs at a new viewport size.
    #[must_use]
    pub fn resized(&self, viewport: Viewport) -> Self {
        Self {
            viewport,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn display_x_accessor(&self) -> &XAccessor<T> {
        self.display_x_accessor.as_ref().unwrap_or(&self.x_accessor)
    }
}

impl<T> Clone for ChartInput<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            series_key: self.series_key.clone(),
            x_accessor: self.x_accessor.clone(),
            display_x_accessor: self.display_x_accessor.clone(),
            x_extents: self.x_extents.clone(),
            viewport: self.viewport,
            margin: self.margin,
            sub_charts: Arc::clone(&self.sub_charts),
        }
    }
}

impl<T> fmt::Debug for ChartInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartInput")
            .field("series_key", &self.series_key)
            .field("len", &self.data.len())
            .field("x_extents", &self.x_extents)
            .field("viewport", &self.viewport)
            .field("margin", &self.margin)
            .field("sub_charts", &self.sub_charts.len())
            .finish_non_exhaustive()
    }
}
