use tracing::trace;

use crate::core::extents::{ExtentsInput, YDomain, real_y_domain};
use crate::core::scale::{Scale, ScaleKind};
use crate::core::sub_chart::{SubChartConfig, SubChartId};
use crate::error::ChartResult;

/// Vertical pixel delta applied to pan-enabled sub-charts.
#[derive(Debug, Clone, Copy)]
pub struct YPan<'a> {
    pub dy: f64,
    /// Sub-charts taking part in the pan; `None` means all of them.
    pub charts: Option<&'a [SubChartId]>,
}

impl YPan<'_> {
    fn includes(&self, id: SubChartId) -> bool {
        self.charts.is_none_or(|charts| charts.contains(&id))
    }
}

/// Refreshes every sub-chart's y scale from the visible window.
///
/// Sub-charts the user panned vertically keep their domain; when `pan`
/// includes them it is shifted by `dy` pixels instead of recomputed.
pub fn update_y_scales<T: Sync>(
    configs: &[SubChartConfig<T>],
    input: &ExtentsInput<'_, T>,
    pan: Option<YPan<'_>>,
) -> ChartResult<Vec<SubChartConfig<T>>> {
    configs
        .iter()
        .map(|config| {
            let discrete = config.y_scale.kind() == ScaleKind::Ordinal;
            let real = real_y_domain(&config.y_extents, discrete, input)
                .or_else(|| config.real_y_domain.clone())
                .unwrap_or_else(|| config.y_domain());

            let domain = if config.y_pan && config.y_pan_enabled {
                match pan {
                    Some(pan) if pan.includes(config.id) => {
                        shifted_domain(&config.y_scale, pan.dy)?.unwrap_or_else(|| config.y_domain())
                    }
                    _ => config.y_domain(),
                }
            } else {
                real.clone()
            };

            trace!(chart_id = config.id.raw(), domain = ?domain, "y scale synchronized");

            let mut next = config.clone();
            next.y_scale = config.rescaled(&domain)?;
            next.real_y_domain = Some(real);
            Ok(next)
        })
        .collect()
}

/// Restores the data-derived domain and clears the pan flag.
///
/// `ids == None` resets every sub-chart. Returns `None` when nothing changed.
pub fn reset_y_domains<T>(
    configs: &[SubChartConfig<T>],
    ids: Option<&[SubChartId]>,
) -> ChartResult<Option<Vec<SubChartConfig<T>>>> {
    let mut changed = false;
    let mut out = Vec::with_capacity(configs.len());
    for config in configs {
        let selected = ids.is_none_or(|ids| ids.contains(&config.id));
        let mut next = config.clone();
        if selected {
            if let Some(real) = &config.real_y_domain {
                if *real != config.y_domain() || config.y_pan_enabled {
                    next.y_scale = config.rescaled(real)?;
                    next.y_pan_enabled = false;
                    changed = true;
                }
            }
        }
        out.push(next);
    }
    Ok(changed.then_some(out))
}

/// Sets a sub-chart's y domain explicitly and marks it pan-enabled.
pub fn with_y_domain<T>(config: &SubChartConfig<T>, domain: &YDomain) -> ChartResult<SubChartConfig<T>> {
    let mut next = config.clone();
    next.y_scale = config.rescaled(domain)?;
    next.y_pan_enabled = true;
    Ok(next)
}

fn shifted_domain(scale: &Scale, dy: f64) -> ChartResult<Option<YDomain>> {
    let Scale::Linear(scale) = scale else {
        return Ok(None);
    };
    let (r0, r1) = scale.range();
    let (lo, hi) = scale.invert_range((r0 - dy, r1 - dy))?;
    Ok(Some(YDomain::Continuous(lo, hi)))
}
