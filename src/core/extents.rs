use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-extents")]
use rayon::prelude::*;

use crate::core::types::{ValueAccessor, XAccessor};
use crate::error::{ChartError, ChartResult};

/// One entry of an x-extent declaration: a fixed bound or an accessor whose
/// minimum and maximum over the dataset both contribute.
pub enum XExtentValue<T> {
    Literal(f64),
    Accessor(XAccessor<T>),
}

impl<T> Clone for XExtentValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(*value),
            Self::Accessor(accessor) => Self::Accessor(accessor.clone()),
        }
    }
}

impl<T> XExtentValue<T> {
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Accessor(a), Self::Accessor(b)) => a.same_as(b),
            _ => false,
        }
    }
}

type XExtentFn<T> = Arc<dyn Fn(&[T]) -> (f64, f64) + Send + Sync>;

/// Policy producing the initial x domain from the full dataset.
pub enum XExtents<T> {
    /// Minimum and maximum of the chart's own x accessor.
    Data,
    Values(Vec<XExtentValue<T>>),
    Function(XExtentFn<T>),
}

impl<T> Clone for XExtents<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Data => Self::Data,
            Self::Values(values) => Self::Values(values.clone()),
            Self::Function(f) => Self::Function(Arc::clone(f)),
        }
    }
}

impl<T> Default for XExtents<T> {
    fn default() -> Self {
        Self::Data
    }
}

impl<T> fmt::Debug for XExtents<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => f.write_str("XExtents::Data"),
            Self::Values(values) => write!(f, "XExtents::Values(len={})", values.len()),
            Self::Function(_) => f.write_str("XExtents::Function"),
        }
    }
}

impl<T> XExtents<T> {
    pub fn function(f: impl Fn(&[T]) -> (f64, f64) + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    #[must_use]
    pub fn literal(start: f64, end: f64) -> Self {
        Self::Values(vec![XExtentValue::Literal(start), XExtentValue::Literal(end)])
    }

    /// Policy identity: literals by value, accessors and functions by identity.
    #[must_use]
    pub fn same_policy(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Data, Self::Data) => true,
            (Self::Values(a), Self::Values(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.same_as(b))
            }
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Resolves the policy against the full dataset.
    pub fn resolve(&self, data: &[T], x: &XAccessor<T>) -> ChartResult<(f64, f64)> {
        let domain = match self {
            Self::Function(f) => f(data),
            Self::Data => min_max(data.iter().map(|item| x.get(item)))
                .ok_or_else(|| ChartError::InvalidData("x extents over empty data".to_owned()))?,
            Self::Values(values) => {
                let mut bounds = Vec::with_capacity(values.len() * 2);
                for value in values {
                    match value {
                        XExtentValue::Literal(literal) => bounds.push(*literal),
                        XExtentValue::Accessor(accessor) => {
                            if let Some((lo, hi)) =
                                min_max(data.iter().map(|item| accessor.get(item)))
                            {
                                bounds.push(lo);
                                bounds.push(hi);
                            }
                        }
                    }
                }
                min_max(bounds.into_iter()).ok_or_else(|| {
                    ChartError::InvalidData("x extents produced no finite bound".to_owned())
                })?
            }
        };
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "x extents must be finite".to_owned(),
            ));
        }
        Ok(domain)
    }
}

/// Vertical domain: an interval for continuous scales, the distinct value
/// set (in first-seen order) for ordinal ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum YDomain {
    Continuous(f64, f64),
    Discrete(Vec<f64>),
}

impl YDomain {
    #[must_use]
    pub fn as_continuous(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous(lo, hi) => Some((*lo, *hi)),
            Self::Discrete(_) => None,
        }
    }
}

/// One entry of a y-extent declaration.
pub enum YExtentSource<T> {
    Literal(f64),
    Accessor(ValueAccessor<T>),
}

impl<T> Clone for YExtentSource<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(*value),
            Self::Accessor(accessor) => Self::Accessor(accessor.clone()),
        }
    }
}

/// Everything an extent calculator may look at.
pub struct ExtentsInput<'a, T> {
    pub plot_data: &'a [T],
    pub x_domain: (f64, f64),
    pub x_accessor: &'a XAccessor<T>,
    pub display_x_accessor: &'a XAccessor<T>,
    pub full_data: &'a [T],
}

type YExtentsFn<T> = Arc<dyn Fn(&ExtentsInput<'_, T>) -> YDomain + Send + Sync>;

/// Rule producing a sub-chart's vertical domain from the visible window.
pub enum YExtents<T> {
    Literal(f64, f64),
    Values(Vec<YExtentSource<T>>),
    Calculator(YExtentsFn<T>),
}

impl<T> Clone for YExtents<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(lo, hi) => Self::Literal(*lo, *hi),
            Self::Values(values) => Self::Values(values.clone()),
            Self::Calculator(f) => Self::Calculator(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for YExtents<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lo, hi) => write!(f, "YExtents::Literal({lo}, {hi})"),
            Self::Values(values) => write!(f, "YExtents::Values(len={})", values.len()),
            Self::Calculator(_) => f.write_str("YExtents::Calculator"),
        }
    }
}

impl<T> YExtents<T> {
    pub fn accessor(f: impl Fn(&T) -> smallvec::SmallVec<[f64; 4]> + Send + Sync + 'static) -> Self {
        Self::Values(vec![YExtentSource::Accessor(ValueAccessor::new(f))])
    }

    pub fn calculator(
        f: impl Fn(&ExtentsInput<'_, T>) -> YDomain + Send + Sync + 'static,
    ) -> Self {
        Self::Calculator(Arc::new(f))
    }

    /// The literal pair when the rule is fully literal.
    #[must_use]
    pub fn literal(&self) -> Option<(f64, f64)> {
        match self {
            Self::Literal(lo, hi) => Some((*lo, *hi)),
            Self::Values(values) => {
                let literals: Option<Vec<f64>> = values
                    .iter()
                    .map(|value| match value {
                        YExtentSource::Literal(literal) => Some(*literal),
                        YExtentSource::Accessor(_) => None,
                    })
                    .collect();
                literals.and_then(|literals| min_max(literals.into_iter()))
            }
            Self::Calculator(_) => None,
        }
    }
}

/// Computes the data-derived vertical domain of one sub-chart.
///
/// Returns `None` when the visible window yields no finite value, in which
/// case callers keep the previous domain.
pub fn real_y_domain<T: Sync>(
    extents: &YExtents<T>,
    discrete: bool,
    input: &ExtentsInput<'_, T>,
) -> Option<YDomain> {
    match extents {
        YExtents::Calculator(f) => Some(f(input)),
        YExtents::Literal(lo, hi) => Some(if discrete {
            YDomain::Discrete(distinct([*lo, *hi].into_iter()))
        } else {
            YDomain::Continuous(lo.min(*hi), lo.max(*hi))
        }),
        YExtents::Values(sources) => {
            let values = collect_values(sources, input.plot_data);
            if discrete {
                let set = distinct(values.into_iter());
                if set.is_empty() {
                    None
                } else {
                    Some(YDomain::Discrete(set))
                }
            } else {
                min_max(values.into_iter()).map(|(lo, hi)| YDomain::Continuous(lo, hi))
            }
        }
    }
}

fn collect_values<T: Sync>(sources: &[YExtentSource<T>], plot_data: &[T]) -> Vec<f64> {
    let mut out = Vec::new();
    for source in sources {
        match source {
            YExtentSource::Literal(value) => out.push(*value),
            YExtentSource::Accessor(accessor) => {
                #[cfg(feature = "parallel-extents")]
                {
                    let values: Vec<f64> = plot_data
                        .par_iter()
                        .flat_map_iter(|item| accessor.values(item))
                        .collect();
                    out.extend(values);
                }

                #[cfg(not(feature = "parallel-extents"))]
                {
                    out.extend(plot_data.iter().flat_map(|item| accessor.values(item)));
                }
            }
        }
    }
    out
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(|value| value.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::{ExtentsInput, XExtents, YDomain, YExtentSource, YExtents, real_y_domain};
    use crate::core::types::{ValueAccessor, XAccessor};

    #[derive(Debug, Clone, Copy)]
    struct Bar {
        x: f64,
        high: f64,
        low: f64,
    }

    fn bars() -> Vec<Bar> {
        vec![
            Bar { x: 0.0, high: 5.0, low: 1.0 },
            Bar { x: 1.0, high: 7.0, low: 2.0 },
            Bar { x: 2.0, high: 6.0, low: 3.0 },
        ]
    }

    #[test]
    fn default_x_extents_span_x_accessor() {
        let x = XAccessor::new(|bar: &Bar| bar.x);
        let domain = XExtents::Data.resolve(&bars(), &x).expect("domain");
        assert_eq!(domain, (0.0, 2.0));
    }

    #[test]
    fn literal_x_extents_mix_with_accessors() {
        let x = XAccessor::new(|bar: &Bar| bar.x);
        let policy = XExtents::Values(vec![
            super::XExtentValue::Literal(-3.0),
            super::XExtentValue::Accessor(x.clone()),
        ]);
        assert_eq!(policy.resolve(&bars(), &x).expect("domain"), (-3.0, 2.0));
    }

    #[test]
    fn y_accessor_extents_take_min_and_max_of_visible_values() {
        let data = bars();
        let x = XAccessor::new(|bar: &Bar| bar.x);
        let input = ExtentsInput {
            plot_data: &data[1..],
            x_domain: (1.0, 2.0),
            x_accessor: &x,
            display_x_accessor: &x,
            full_data: &data,
        };
        let extents = YExtents::accessor(|bar: &Bar| smallvec![bar.high, bar.low]);
        assert_eq!(real_y_domain(&extents, false, &input), Some(YDomain::Continuous(2.0, 7.0)));
    }

    #[test]
    fn discrete_y_extents_keep_first_seen_order() {
        let data = [3.0, 1.0, 3.0, 2.0];
        let x = XAccessor::new(|value: &f64| *value);
        let input = ExtentsInput {
            plot_data: &data,
            x_domain: (0.0, 3.0),
            x_accessor: &x,
            display_x_accessor: &x,
            full_data: &data,
        };
        let extents = YExtents::Values(vec![YExtentSource::Accessor(ValueAccessor::single(
            |value: &f64| *value,
        ))]);
        assert_eq!(
            real_y_domain(&extents, true, &input),
            Some(YDomain::Discrete(vec![3.0, 1.0, 2.0]))
        );
    }

    #[test]
    fn literal_detection_requires_every_entry_literal() {
        let literal: YExtents<Bar> =
            YExtents::Values(vec![YExtentSource::Literal(10.0), YExtentSource::Literal(0.0)]);
        assert_eq!(literal.literal(), Some((0.0, 10.0)));
        let mixed = YExtents::Values(vec![
            YExtentSource::Literal(0.0),
            YExtentSource::Accessor(ValueAccessor::single(|bar: &Bar| bar.high)),
        ]);
        assert_eq!(mixed.literal(), None);
    }
}
