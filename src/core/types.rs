use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Outer margin between the viewport edge and the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(20.0, 30.0, 30.0, 80.0)
    }
}

/// Plot area left after subtracting margins from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn inner(viewport: Viewport, margin: Margin) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let width = f64::from(viewport.width) - margin.left - margin.right;
        let height = f64::from(viewport.height) - margin.top - margin.bottom;
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "margins leave no plot area: {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset_by(self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Horizontal padding inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum XPadding {
    Symmetric(f64),
    Sides { left: f64, right: f64 },
}

impl XPadding {
    #[must_use]
    pub fn sides(self) -> (f64, f64) {
        match self {
            Self::Symmetric(value) => (value, value),
            Self::Sides { left, right } => (left, right),
        }
    }

    #[must_use]
    pub fn symmetric(self) -> Option<f64> {
        match self {
            Self::Symmetric(value) => Some(value),
            Self::Sides { .. } => None,
        }
    }
}

impl Default for XPadding {
    fn default() -> Self {
        Self::Symmetric(0.0)
    }
}

/// Vertical padding inside a sub-chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum YPadding {
    Symmetric(f64),
    Sides { top: f64, bottom: f64 },
}

impl YPadding {
    #[must_use]
    pub fn sides(self) -> (f64, f64) {
        match self {
            Self::Symmetric(value) => (value, value),
            Self::Sides { top, bottom } => (top, bottom),
        }
    }

    #[must_use]
    pub fn symmetric(self) -> Option<f64> {
        match self {
            Self::Symmetric(value) => Some(value),
            Self::Sides { .. } => None,
        }
    }
}

impl Default for YPadding {
    fn default() -> Self {
        Self::Symmetric(0.0)
    }
}

/// Extracts the domain position of a record.
///
/// Identity is the identity of the wrapped closure: clones compare equal,
/// two separately constructed accessors never do. The controller resets the
/// viewport when the accessor identity changes.
pub struct XAccessor<T> {
    f: Arc<dyn Fn(&T) -> f64 + Send + Sync>,
}

impl<T> XAccessor<T> {
    pub fn new(f: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, item: &T) -> f64 {
        (self.f)(item)
    }

    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl<T> Clone for XAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for XAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XAccessor").finish_non_exhaustive()
    }
}

/// Extracts one or more vertical values from a record (e.g. `[high, low]`).
pub struct ValueAccessor<T> {
    f: Arc<dyn Fn(&T) -> SmallVec<[f64; 4]> + Send + Sync>,
}

impl<T> ValueAccessor<T> {
    pub fn new(f: impl Fn(&T) -> SmallVec<[f64; 4]> + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }

    /// Accessor returning a single value per record.
    pub fn single(f: impl Fn(&T) -> f64 + Send + Sync + 'static) -> Self {
        Self::new(move |item| smallvec::smallvec![f(item)])
    }

    #[inline]
    #[must_use]
    pub fn values(&self, item: &T) -> SmallVec<[f64; 4]> {
        (self.f)(item)
    }
}

impl<T> Clone for ValueAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for ValueAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueAccessor").finish_non_exhaustive()
    }
}
