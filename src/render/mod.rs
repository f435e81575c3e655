mod layer_stack;
mod null_surface;

pub use layer_stack::{CanvasLayer, ClearScope};
pub use null_surface::NullSurface;

use serde::{Deserialize, Serialize};

use crate::core::SubChartId;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Three independently clearable layers.
    #[default]
    Raster,
    /// Retained drawing with per-sub-chart clip regions.
    Vector,
}

/// Clip rectangle for one sub-chart, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRegion {
    pub chart_id: SubChartId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ClipRegion {
    pub fn validate(&self) -> ChartResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "invalid clip region for chart {}",
                self.chart_id.raw()
            )));
        }
        Ok(())
    }
}

/// Contract implemented by any drawing backend.
///
/// The controller only clears layers and publishes clip regions; subscribers
/// do the actual drawing through their own handle to the backend.
pub trait Surface {
    fn kind(&self) -> SurfaceKind;
    fn clear(&mut self, layer: CanvasLayer) -> ChartResult<()>;
    fn set_clip_regions(&mut self, regions: &[ClipRegion]) -> ChartResult<()>;
}
