use crate::core::Point;
use crate::core::windowing::current_item_index;

use super::{ChartInput, ViewState, ZoomAnchor};

/// Domain value kept under its pixel while zooming.
pub(super) fn resolve_zoom_anchor<T>(
    anchor: ZoomAnchor,
    view: &ViewState<T>,
    input: &ChartInput<T>,
    mouse: Point,
) -> Option<f64> {
    let plot_data = view.window.slice(&input.data);
    let x = &input.x_accessor;
    match anchor {
        ZoomAnchor::Mouse => current_item_index(&view.x_scale, x, mouse.x, plot_data)
            .map(|index| x.get(&plot_data[index])),
        ZoomAnchor::LastVisibleItem => plot_data.last().map(|item| x.get(item)),
        ZoomAnchor::RightDomain => Some(view.window.domain.1),
        ZoomAnchor::LastDataItem => input.data.last().map(|item| x.get(item)),
    }
}
