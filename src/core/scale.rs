use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Interpolation family of a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleKind {
    #[default]
    Linear,
    Ordinal,
}

/// Continuous scale mapping a domain interval onto a pixel range.
///
/// The value is immutable: every edit returns a new scale so downstream
/// readers can compare snapshots by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        validate_pair(domain, "scale domain")?;
        validate_pair(range, "scale range")?;
        Ok(Self { domain, range })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    pub fn with_domain(self, domain: (f64, f64)) -> ChartResult<Self> {
        Self::new(domain, self.range)
    }

    pub fn with_range(self, range: (f64, f64)) -> ChartResult<Self> {
        Self::new(self.domain, range)
    }

    /// Maps a domain value to pixels.
    ///
    /// A zero-width domain maps every value to the middle of the range.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            return (self.range.0 + self.range.1) / 2.0;
        }
        let t = (value - self.domain.0) / span;
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return (self.domain.0 + self.domain.1) / 2.0;
        }
        let t = (pixel - self.range.0) / span;
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }

    /// Inverts both ends of a pixel interval.
    pub fn invert_range(self, range: (f64, f64)) -> ChartResult<(f64, f64)> {
        let domain = (self.invert(range.0), self.invert(range.1));
        validate_pair(domain, "inverted domain")?;
        Ok(domain)
    }
}

/// Point scale over a discrete value set.
///
/// Values are spaced evenly across the range with `padding` steps of
/// outer padding on both sides. There is no inverse mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    domain: IndexSet<OrderedFloat<f64>>,
    range: (f64, f64),
    padding: f64,
}

impl OrdinalScale {
    pub fn new(
        values: impl IntoIterator<Item = f64>,
        range: (f64, f64),
        padding: f64,
    ) -> ChartResult<Self> {
        validate_pair(range, "scale range")?;
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidData(
                "ordinal padding must be finite and >= 0".to_owned(),
            ));
        }
        let domain = values.into_iter().map(OrderedFloat).collect();
        Ok(Self {
            domain,
            range,
            padding,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.domain.iter().map(|value| value.0)
    }

    pub fn with_range(&self, range: (f64, f64)) -> ChartResult<Self> {
        validate_pair(range, "scale range")?;
        Ok(Self {
            domain: self.domain.clone(),
            range,
            padding: self.padding,
        })
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        let slots = (self.domain.len().saturating_sub(1)) as f64 + 2.0 * self.padding;
        if slots <= 0.0 {
            return 0.0;
        }
        (self.range.1 - self.range.0) / slots
    }

    #[must_use]
    pub fn position_of_index(&self, index: usize) -> f64 {
        if self.domain.len() <= 1 && self.padding == 0.0 {
            return (self.range.0 + self.range.1) / 2.0;
        }
        self.range.0 + self.step() * (self.padding + index as f64)
    }

    /// Maps a domain value to its slot position; unknown values map to `None`.
    #[must_use]
    pub fn map(&self, value: f64) -> Option<f64> {
        self.domain
            .get_index_of(&OrderedFloat(value))
            .map(|index| self.position_of_index(index))
    }

    /// Index of the slot closest to a pixel position.
    #[must_use]
    pub fn nearest_index(&self, pixel: f64) -> Option<usize> {
        if self.domain.is_empty() {
            return None;
        }
        let step = self.step();
        if step == 0.0 {
            return Some(0);
        }
        let raw = ((pixel - self.range.0) / step - self.padding).round();
        let last = (self.domain.len() - 1) as f64;
        Some(raw.clamp(0.0, last) as usize)
    }

    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.domain.get_index(index).map(|value| value.0)
    }
}

/// Scale held by the controller for the x axis and by each sub-chart for y.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Linear(LinearScale),
    Ordinal(OrdinalScale),
}

impl Scale {
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Ordinal(_) => ScaleKind::Ordinal,
        }
    }

    #[must_use]
    pub fn is_invertible(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Ordinal(scale) => scale.range(),
        }
    }

    pub fn with_range(&self, range: (f64, f64)) -> ChartResult<Self> {
        match self {
            Self::Linear(scale) => scale.with_range(range).map(Self::Linear),
            Self::Ordinal(scale) => scale.with_range(range).map(Self::Ordinal),
        }
    }

    /// Continuous domain bounds; `None` for ordinal scales.
    #[must_use]
    pub fn continuous_domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(scale) => Some(scale.domain()),
            Self::Ordinal(_) => None,
        }
    }

    /// Maps a domain value to pixels; ordinal scales return `None` for unknown values.
    #[must_use]
    pub fn map(&self, value: f64) -> Option<f64> {
        match self {
            Self::Linear(scale) => Some(scale.map(value)),
            Self::Ordinal(scale) => scale.map(value),
        }
    }

    pub fn as_linear(&self, operation: &'static str) -> ChartResult<LinearScale> {
        match self {
            Self::Linear(scale) => Ok(*scale),
            Self::Ordinal(_) => Err(ChartError::NonInvertibleScale { operation }),
        }
    }

    pub fn invert(&self, pixel: f64, operation: &'static str) -> ChartResult<f64> {
        self.as_linear(operation).map(|scale| scale.invert(pixel))
    }
}

fn validate_pair(pair: (f64, f64), what: &str) -> ChartResult<()> {
    if !pair.0.is_finite() || !pair.1.is_finite() {
        return Err(ChartError::InvalidData(format!("{what} must be finite")));
    }
    Ok(())
}
