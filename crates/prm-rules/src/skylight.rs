//! # Baseline Skylight-to-Roof Ratio
//!
//! G3.1.5: baseline skylight area is the proposed area, capped at the
//! edition's percentage of gross roof area. Skylights are reduced in place
//! by shrinking each one toward its centroid by the same area fraction.

use serde::Serialize;

use prm_model::{ConditioningCategory, Model, OutsideBoundary, SubSurfaceType, SurfaceType};

use crate::error::RuleResult;
use crate::ruleset::RuleSet;

/// Roof total starts here so a roofless model yields a finite ratio.
const ROOF_AREA_SEED: f64 = 0.001;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkylightRatioAdjustment {
    /// m², including space multipliers.
    pub roof_area: f64,
    /// m², including space multipliers, before adjustment.
    pub skylight_area: f64,
    /// Percent, rounded to one decimal.
    pub skylight_to_roof_ratio: f64,
    /// Percent.
    pub limit: f64,
    /// Fraction of area removed from every skylight, when reduced.
    pub reduction: Option<f64>,
    pub skylights: usize,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl RuleSet<'_> {
    /// Reduce skylights so the skylight-to-roof ratio does not exceed the limit.
    pub fn apply_baseline_skylight_to_roof_ratio(&self, model: &mut Model) -> RuleResult<SkylightRatioAdjustment> {
        let limit = self.skylight_to_roof_ratio_limit()?;

        let mut roof_area = ROOF_AREA_SEED;
        let mut skylight_area = 0.0;
        let mut skylights = 0;
        for space in &model.spaces {
            if space.conditioning == ConditioningCategory::Unconditioned {
                continue;
            }
            let multiplier = model.space_multiplier(space);
            for roof in space.outdoor_roofs() {
                roof_area += roof.gross_area * multiplier;
                for sub in roof
                    .sub_surfaces
                    .iter()
                    .filter(|s| s.sub_surface_type == SubSurfaceType::Skylight)
                {
                    skylight_area += sub.net_area() * multiplier;
                    skylights += 1;
                }
            }
        }

        let srr = round1(100.0 * skylight_area / roof_area);
        tracing::debug!(roof_area, skylight_area, srr, limit, "skylight-to-roof ratio");

        let mut adjustment = SkylightRatioAdjustment {
            roof_area,
            skylight_area,
            skylight_to_roof_ratio: srr,
            limit,
            reduction: None,
            skylights,
        };
        if srr <= limit {
            return Ok(adjustment);
        }

        let reduction = 1.0 - limit / srr;
        for space in model
            .spaces
            .iter_mut()
            .filter(|s| s.conditioning != ConditioningCategory::Unconditioned)
        {
            for sub in space
                .surfaces
                .iter_mut()
                .filter(|s| {
                    s.outside_boundary == OutsideBoundary::Outdoors && s.surface_type == SurfaceType::RoofCeiling
                })
                .flat_map(|s| s.sub_surfaces.iter_mut())
                .filter(|s| s.sub_surface_type == SubSurfaceType::Skylight)
            {
                sub.shrink_toward_centroid(reduction);
            }
        }
        tracing::info!(
            srr,
            limit,
            reduction,
            skylights,
            "reduced baseline skylights to the skylight-to-roof ratio limit"
        );
        adjustment.reduction = Some(reduction);
        Ok(adjustment)
    }
}
