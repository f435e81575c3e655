use crate::error::ChartResult;
use crate::render::{CanvasLayer, ClipRegion, Surface, SurfaceKind};

/// Headless surface used by tests and non-drawing hosts.
///
/// Records every clear so redraw planning can be asserted.
#[derive(Debug, Default)]
pub struct NullSurface {
    kind: SurfaceKind,
    pub cleared: Vec<CanvasLayer>,
    pub clip_regions: Vec<ClipRegion>,
}

impl NullSurface {
    #[must_use]
    pub fn raster() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn vector() -> Self {
        Self {
            kind: SurfaceKind::Vector,
            ..Self::default()
        }
    }

    /// Drains the recorded clears.
    pub fn take_cleared(&mut self) -> Vec<CanvasLayer> {
        std::mem::take(&mut self.cleared)
    }
}

impl Surface for NullSurface {
    fn kind(&self) -> SurfaceKind {
        self.kind
    }

    fn clear(&mut self, layer: CanvasLayer) -> ChartResult<()> {
        self.cleared.push(layer);
        Ok(())
    }

    fn set_clip_regions(&mut self, regions: &[ClipRegion]) -> ChartResult<()> {
        for region in regions {
            region.validate()?;
        }
        self.clip_regions = regions.to_vec();
        Ok(())
    }
}
