use std::ops::Range;

use crate::core::scale::Scale;
use crate::core::types::XAccessor;
use crate::error::{ChartError, ChartResult};

/// Indexes of the items bracketing `value` on the x accessor.
///
/// Returns `(left, right)` with `left == right` on an exact hit or when
/// `value` falls outside the data. Data must be sorted ascending.
#[must_use]
pub fn closest_item_indexes<T>(data: &[T], value: f64, x: &XAccessor<T>) -> Option<(usize, usize)> {
    if data.is_empty() {
        return None;
    }
    let p = data.partition_point(|item| x.get(item) < value);
    if p == data.len() {
        let last = data.len() - 1;
        return Some((last, last));
    }
    if p == 0 || x.get(&data[p]) == value {
        return Some((p, p));
    }
    Some((p - 1, p))
}

/// Minimal slice of `data` covered by `domain`.
///
/// The slice starts at the first item at or after the domain start and ends
/// at the last item at or before the domain end. Out-of-data domains
/// collapse onto the nearest edge item; a domain strictly between two items
/// yields an empty range.
#[must_use]
pub fn slice_for_domain<T>(data: &[T], domain: (f64, f64), x: &XAccessor<T>) -> Range<usize> {
    let (start, end) = ordered(domain);
    let (Some((_, left)), Some((right, _))) = (
        closest_item_indexes(data, start, x),
        closest_item_indexes(data, end, x),
    ) else {
        return 0..0;
    };
    let end_exclusive = right + 1;
    if left >= end_exclusive {
        return left..left;
    }
    left..end_exclusive
}

/// Index of the item whose x value is nearest to `value`.
#[must_use]
pub fn closest_item_index<T>(data: &[T], value: f64, x: &XAccessor<T>) -> Option<usize> {
    let (left, right) = closest_item_indexes(data, value, x)?;
    let left_distance = (value - x.get(&data[left])).abs();
    let right_distance = (x.get(&data[right]) - value).abs();
    if right_distance < left_distance {
        Some(right)
    } else {
        Some(left)
    }
}

/// First index whose x value precedes its predecessor.
#[must_use]
pub fn find_unsorted_index<T>(data: &[T], x: &XAccessor<T>) -> Option<usize> {
    data.windows(2)
        .position(|pair| x.get(&pair[1]) < x.get(&pair[0]))
        .map(|index| index + 1)
}

pub fn ensure_sorted<T>(data: &[T], x: &XAccessor<T>) -> ChartResult<()> {
    match find_unsorted_index(data, x) {
        Some(index) => Err(ChartError::UnsortedData { index }),
        None => Ok(()),
    }
}

fn ordered(domain: (f64, f64)) -> (f64, f64) {
    if domain.0 <= domain.1 {
        domain
    } else {
        (domain.1, domain.0)
    }
}

/// Index into `plot_data` of the item under pixel `x_px`.
///
/// Invertible scales search by value, ordinal scales pick the nearest slot.
#[must_use]
pub fn current_item_index<T>(
    scale: &Scale,
    x: &XAccessor<T>,
    x_px: f64,
    plot_data: &[T],
) -> Option<usize> {
    match scale {
        Scale::Linear(scale) => closest_item_index(plot_data, scale.invert(x_px), x),
        Scale::Ordinal(scale) => {
            if plot_data.is_empty() {
                return None;
            }
            let index = scale.nearest_index(x_px).unwrap_or(0);
            Some(index.min(plot_data.len() - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        closest_item_index, closest_item_indexes, current_item_index, find_unsorted_index,
        slice_for_domain,
    };
    use crate::core::scale::{LinearScale, OrdinalScale, Scale};
    use crate::core::types::XAccessor;

    fn identity() -> XAccessor<f64> {
        XAccessor::new(|value: &f64| *value)
    }

    #[test]
    fn closest_indexes_bracket_value_between_items() {
        let data = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(closest_item_indexes(&data, 15.0, &identity()), Some((1, 2)));
        assert_eq!(closest_item_indexes(&data, 20.0, &identity()), Some((2, 2)));
        assert_eq!(closest_item_indexes(&data, -5.0, &identity()), Some((0, 0)));
        assert_eq!(closest_item_indexes(&data, 99.0, &identity()), Some((3, 3)));
    }

    #[test]
    fn slice_covers_items_inside_domain() {
        let data: Vec<f64> = (0..200).map(f64::from).collect();
        assert_eq!(slice_for_domain(&data, (150.0, 199.0), &identity()), 150..200);
        assert_eq!(slice_for_domain(&data, (149.5, 160.2), &identity()), 150..161);
        assert_eq!(slice_for_domain(&data, (-20.0, 29.0), &identity()), 0..30);
    }

    #[test]
    fn slice_between_two_items_is_empty() {
        let data = [0.0, 10.0];
        let range = slice_for_domain(&data, (2.0, 8.0), &identity());
        assert!(range.is_empty());
    }

    #[test]
    fn slice_past_data_end_collapses_to_last_item() {
        let data = [0.0, 1.0, 2.0];
        assert_eq!(slice_for_domain(&data, (5.0, 9.0), &identity()), 2..3);
    }

    #[test]
    fn closest_index_prefers_nearer_neighbour() {
        let data = [0.0, 10.0, 20.0];
        assert_eq!(closest_item_index(&data, 14.0, &identity()), Some(1));
        assert_eq!(closest_item_index(&data, 16.0, &identity()), Some(2));
    }

    #[test]
    fn detects_first_unsorted_item() {
        let data = [0.0, 1.0, 1.0, 0.5, 2.0];
        assert_eq!(find_unsorted_index(&data, &identity()), Some(3));
        assert_eq!(find_unsorted_index(&[0.0, 1.0], &identity()), None);
    }

    #[test]
    fn current_item_follows_pointer_on_both_scale_kinds() {
        let data = [0.0, 10.0, 20.0, 30.0];
        let linear = Scale::Linear(LinearScale::new((0.0, 30.0), (0.0, 300.0)).expect("scale"));
        assert_eq!(current_item_index(&linear, &identity(), 160.0, &data), Some(2));

        let ordinal = Scale::Ordinal(
            OrdinalScale::new(data, (0.0, 30.0), 0.0).expect("ordinal"),
        );
        assert_eq!(current_item_index(&ordinal, &identity(), 21.0, &data), Some(2));
        assert_eq!(current_item_index(&ordinal, &identity(), 0.0, &[] as &[f64]), None);
    }
}
