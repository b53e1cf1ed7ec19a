//! # Spaces, Surfaces, and Ventilation Specifications
//!
//! Geometry and occupancy-side objects: spaces with their envelope surfaces,
//! space types carrying standards classifications, outdoor-air design
//! specifications, and infiltration objects.

use serde::{Deserialize, Serialize};

use prm_core::{ScheduleId, SpaceId, SpaceTypeId, ThermalZoneId};

// ─── Geometry ───────────────────────────────────────────────────────────────

/// A point in model coordinates (metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Area of a planar polygon (Newell's method).
pub fn polygon_area(vertices: &[Point3]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let (mut nx, mut ny, mut nz) = (0.0, 0.0, 0.0);
    for (i, a) in vertices.iter().enumerate() {
        let b = &vertices[(i + 1) % vertices.len()];
        nx += (a.y - b.y) * (a.z + b.z);
        ny += (a.z - b.z) * (a.x + b.x);
        nz += (a.x - b.x) * (a.y + b.y);
    }
    0.5 * (nx * nx + ny * ny + nz * nz).sqrt()
}

/// Vertex centroid of a polygon.
pub fn polygon_centroid(vertices: &[Point3]) -> Option<Point3> {
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let (sx, sy, sz) = vertices
        .iter()
        .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
    Some(Point3::new(sx / n, sy / n, sz / n))
}

// ─── Surfaces ───────────────────────────────────────────────────────────────

/// Surface classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceType {
    Wall,
    RoofCeiling,
    Floor,
}

/// What lies on the other side of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutsideBoundary {
    Outdoors,
    Ground,
    Adiabatic,
    /// An interior surface shared with another space.
    Surface { adjacent_space: SpaceId },
}

/// Sub-surface classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubSurfaceType {
    FixedWindow,
    OperableWindow,
    Skylight,
    Door,
    GlassDoor,
}

/// A window, skylight, or door set into a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSurface {
    pub name: String,
    pub sub_surface_type: SubSurfaceType,
    pub vertices: Vec<Point3>,
}

impl SubSurface {
    /// Net area in m².
    pub fn net_area(&self) -> f64 {
        polygon_area(&self.vertices)
    }

    /// Shrink the sub-surface toward its centroid so its area falls by
    /// `fraction` (0.0 keeps it, 1.0 collapses it).
    pub fn shrink_toward_centroid(&mut self, fraction: f64) {
        let Some(c) = polygon_centroid(&self.vertices) else {
            return;
        };
        let scale = (1.0 - fraction.clamp(0.0, 1.0)).sqrt();
        for v in &mut self.vertices {
            v.x = c.x + (v.x - c.x) * scale;
            v.y = c.y + (v.y - c.y) * scale;
            v.z = c.z + (v.z - c.z) * scale;
        }
    }
}

/// An envelope or interior surface of a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub surface_type: SurfaceType,
    pub outside_boundary: OutsideBoundary,
    /// Gross area including sub-surfaces, m².
    pub gross_area: f64,
    #[serde(default)]
    pub sub_surfaces: Vec<SubSurface>,
}

// ─── Outdoor air and infiltration ───────────────────────────────────────────

/// How the per-person, per-area, per-zone, and ACH terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutdoorAirMethod {
    Sum,
    Maximum,
}

/// Design outdoor-air requirement of a space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpecificationOutdoorAir {
    pub name: String,
    pub method: OutdoorAirMethod,
    /// m³/s per person.
    #[serde(default)]
    pub flow_per_person: f64,
    /// m³/s per m² of floor.
    #[serde(default)]
    pub flow_per_floor_area: f64,
    /// m³/s.
    #[serde(default)]
    pub flow_per_zone: f64,
    /// Air changes per hour.
    #[serde(default)]
    pub air_changes_per_hour: f64,
}

impl DesignSpecificationOutdoorAir {
    /// Outdoor airflow (m³/s) for a space of the given size and occupancy.
    pub fn flow_rate(&self, floor_area_m2: f64, volume_m3: f64, people: f64) -> f64 {
        let terms = [
            self.flow_per_person * people,
            self.flow_per_floor_area * floor_area_m2,
            self.flow_per_zone,
            self.air_changes_per_hour * volume_m3 / 3600.0,
        ];
        match self.method {
            OutdoorAirMethod::Sum => terms.iter().sum(),
            OutdoorAirMethod::Maximum => terms.iter().copied().fold(0.0, f64::max),
        }
    }
}

/// Design flow rate calculation method of an infiltration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfiltrationMethod {
    #[serde(rename = "Flow/Zone")]
    FlowPerZone,
    #[serde(rename = "Flow/Area")]
    FlowPerArea,
    #[serde(rename = "Flow/ExteriorArea")]
    FlowPerExteriorArea,
    #[serde(rename = "Flow/ExteriorWallArea")]
    FlowPerExteriorWallArea,
    #[serde(rename = "AirChanges/Hour")]
    AirChangesPerHour,
}

impl InfiltrationMethod {
    /// EnergyPlus keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlowPerZone => "Flow/Zone",
            Self::FlowPerArea => "Flow/Area",
            Self::FlowPerExteriorArea => "Flow/ExteriorArea",
            Self::FlowPerExteriorWallArea => "Flow/ExteriorWallArea",
            Self::AirChangesPerHour => "AirChanges/Hour",
        }
    }
}

impl std::fmt::Display for InfiltrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A design-flow-rate infiltration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infiltration {
    pub name: String,
    pub method: InfiltrationMethod,
    /// m³/s, used with `Flow/Zone`.
    #[serde(default)]
    pub design_flow_rate: Option<f64>,
    /// m³/s per m² floor.
    #[serde(default)]
    pub flow_per_floor_area: Option<f64>,
    /// m³/s per m² exterior surface.
    #[serde(default)]
    pub flow_per_exterior_surface_area: Option<f64>,
    /// m³/s per m² exterior wall.
    #[serde(default)]
    pub flow_per_exterior_wall_area: Option<f64>,
    #[serde(default)]
    pub air_changes_per_hour: Option<f64>,
    /// Constant, temperature, velocity, and velocity-squared terms.
    pub coefficients: [f64; 4],
    #[serde(default)]
    pub schedule: Option<ScheduleId>,
}

impl Infiltration {
    /// Default EnergyPlus coefficients.
    pub const DEFAULT_COEFFICIENTS: [f64; 4] = [1.0, 0.0, 0.0, 0.0];

    /// An infiltration object specified per unit exterior wall area.
    pub fn per_exterior_wall_area(name: impl Into<String>, rate: f64, coefficients: [f64; 4]) -> Self {
        Self {
            name: name.into(),
            method: InfiltrationMethod::FlowPerExteriorWallArea,
            design_flow_rate: None,
            flow_per_floor_area: None,
            flow_per_exterior_surface_area: None,
            flow_per_exterior_wall_area: Some(rate),
            air_changes_per_hour: None,
            coefficients,
            schedule: None,
        }
    }

    /// An infiltration object specified per unit floor area.
    pub fn per_floor_area(name: impl Into<String>, rate: f64) -> Self {
        Self {
            name: name.into(),
            method: InfiltrationMethod::FlowPerArea,
            design_flow_rate: None,
            flow_per_floor_area: Some(rate),
            flow_per_exterior_surface_area: None,
            flow_per_exterior_wall_area: None,
            air_changes_per_hour: None,
            coefficients: Self::DEFAULT_COEFFICIENTS,
            schedule: None,
        }
    }
}

/// Effective-leakage-area infiltration (residential model; not valid for PRM).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLeakageArea {
    pub name: String,
    pub space: SpaceId,
}

// ─── Spaces ─────────────────────────────────────────────────────────────────

/// Conditioning category per 90.1 definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditioningCategory {
    Conditioned,
    Semiheated,
    Unconditioned,
}

/// A space type: standards classification plus shared ventilation and infiltration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceType {
    pub id: SpaceTypeId,
    pub name: String,
    #[serde(default)]
    pub standards_building_type: Option<String>,
    #[serde(default)]
    pub standards_space_type: Option<String>,
    #[serde(default)]
    pub design_outdoor_air: Option<DesignSpecificationOutdoorAir>,
    #[serde(default)]
    pub infiltration: Vec<Infiltration>,
}

impl SpaceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SpaceTypeId::new(),
            name: name.into(),
            standards_building_type: None,
            standards_space_type: None,
            design_outdoor_air: None,
            infiltration: Vec::new(),
        }
    }
}

/// An enclosed space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    /// m².
    pub floor_area: f64,
    /// m³.
    pub volume: f64,
    pub conditioning: ConditioningCategory,
    #[serde(default)]
    pub space_type: Option<SpaceTypeId>,
    #[serde(default)]
    pub thermal_zone: Option<ThermalZoneId>,
    #[serde(default)]
    pub design_outdoor_air: Option<DesignSpecificationOutdoorAir>,
    #[serde(default)]
    pub infiltration: Vec<Infiltration>,
    #[serde(default)]
    pub surfaces: Vec<Surface>,
}

impl Space {
    pub fn new(name: impl Into<String>, floor_area: f64, volume: f64) -> Self {
        Self {
            id: SpaceId::new(),
            name: name.into(),
            floor_area,
            volume,
            conditioning: ConditioningCategory::Conditioned,
            space_type: None,
            thermal_zone: None,
            design_outdoor_air: None,
            infiltration: Vec::new(),
            surfaces: Vec::new(),
        }
    }

    /// Gross area of surfaces exposed to outdoors, m².
    pub fn exterior_area(&self) -> f64 {
        self.surfaces
            .iter()
            .filter(|s| s.outside_boundary == OutsideBoundary::Outdoors)
            .map(|s| s.gross_area)
            .sum()
    }

    /// Gross area of walls exposed to outdoors, m².
    pub fn exterior_wall_area(&self) -> f64 {
        self.surfaces
            .iter()
            .filter(|s| {
                s.outside_boundary == OutsideBoundary::Outdoors && s.surface_type == SurfaceType::Wall
            })
            .map(|s| s.gross_area)
            .sum()
    }

    /// Iterate over outdoor roof surfaces.
    pub fn outdoor_roofs(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter().filter(|s| {
            s.outside_boundary == OutsideBoundary::Outdoors && s.surface_type == SurfaceType::RoofCeiling
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(side, 0.0, 3.0),
            Point3::new(side, side, 3.0),
            Point3::new(0.0, side, 3.0),
        ]
    }

    #[test]
    fn test_polygon_area_square() {
        assert!((polygon_area(&square(2.0)) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&square(2.0)[..2]), 0.0);
    }

    #[test]
    fn test_shrink_preserves_centroid_and_scales_area() {
        let mut sky = SubSurface {
            name: "sky".into(),
            sub_surface_type: SubSurfaceType::Skylight,
            vertices: square(2.0),
        };
        let before = polygon_centroid(&sky.vertices).unwrap();
        sky.shrink_toward_centroid(0.25);
        let after = polygon_centroid(&sky.vertices).unwrap();
        assert!((sky.net_area() - 3.0).abs() < 1e-9);
        assert!((before.x - after.x).abs() < 1e-12);
        assert!((before.y - after.y).abs() < 1e-12);
    }

    #[test]
    fn test_oa_sum_and_maximum() {
        let mut dsoa = DesignSpecificationOutdoorAir {
            name: "office".into(),
            method: OutdoorAirMethod::Sum,
            flow_per_person: 0.0025,
            flow_per_floor_area: 0.0003,
            flow_per_zone: 0.0,
            air_changes_per_hour: 0.0,
        };
        let sum = dsoa.flow_rate(100.0, 300.0, 10.0);
        assert!((sum - (0.025 + 0.03)).abs() < 1e-12);
        dsoa.method = OutdoorAirMethod::Maximum;
        assert!((dsoa.flow_rate(100.0, 300.0, 10.0) - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_exterior_areas() {
        let mut space = Space::new("s", 100.0, 300.0);
        space.surfaces.push(Surface {
            name: "w1".into(),
            surface_type: SurfaceType::Wall,
            outside_boundary: OutsideBoundary::Outdoors,
            gross_area: 30.0,
            sub_surfaces: vec![],
        });
        space.surfaces.push(Surface {
            name: "r1".into(),
            surface_type: SurfaceType::RoofCeiling,
            outside_boundary: OutsideBoundary::Outdoors,
            gross_area: 100.0,
            sub_surfaces: vec![],
        });
        space.surfaces.push(Surface {
            name: "f1".into(),
            surface_type: SurfaceType::Floor,
            outside_boundary: OutsideBoundary::Ground,
            gross_area: 100.0,
            sub_surfaces: vec![],
        });
        assert_eq!(space.exterior_wall_area(), 30.0);
        assert_eq!(space.exterior_area(), 130.0);
        assert_eq!(space.outdoor_roofs().count(), 1);
    }

    #[test]
    fn test_infiltration_method_serde_keyword() {
        let json = serde_json::to_string(&InfiltrationMethod::FlowPerExteriorWallArea).unwrap();
        assert_eq!(json, "\"Flow/ExteriorWallArea\"");
    }
}
