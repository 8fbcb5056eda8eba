//! Danger zones and the ordered zone index used to classify positions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{DisplayColor, Point};
use crate::{Result, RiskError};

/// Label reported for positions outside every danger zone
pub const SAFE_ZONE_LABEL: &str = "SAFE";

/// Largest base risk a zone may carry
pub const MAX_ZONE_BASE_RISK: u8 = 50;

/// Tolerance used when testing whether a point lies on a polygon edge
const EDGE_EPSILON: f64 = 1e-9;

/// Serialized form of a zone, as it appears in site configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Unique zone key (e.g. `HEAVY_MACHINERY`)
    pub name: String,
    /// Ordered polygon vertices as `[x, y]` pairs
    pub vertices: Vec<[f64; 2]>,
    /// Base risk added while a person is inside (0-50)
    pub base_risk: u8,
    /// Human-readable label for overlays
    #[serde(default)]
    pub label: Option<String>,
    /// Overlay color (BGR)
    #[serde(default = "default_zone_color")]
    pub color: DisplayColor,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

fn default_zone_color() -> DisplayColor {
    DisplayColor::RED
}

impl ZoneSpec {
    /// Create a zone spec with default display metadata
    pub fn new(name: &str, vertices: Vec<[f64; 2]>, base_risk: u8) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            base_risk,
            label: None,
            color: default_zone_color(),
            description: String::new(),
        }
    }

    /// Set the overlay label
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Set the overlay color
    pub fn with_color(mut self, color: DisplayColor) -> Self {
        self.color = color;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Reference layout for a 1280x720 industrial floor camera.
    ///
    /// Declaration order is evaluation priority: heavy machinery wins over
    /// the electrical cabinet where the two overlap.
    pub fn industrial_defaults() -> Vec<ZoneSpec> {
        vec![
            ZoneSpec::new(
                "HEAVY_MACHINERY",
                vec![[300.0, 200.0], [900.0, 200.0], [900.0, 600.0], [300.0, 600.0]],
                40,
            )
            .with_label("HEAVY MACHINERY AREA")
            .with_color(DisplayColor::RED)
            .with_description("Industrial machinery - highest danger"),
            ZoneSpec::new(
                "ELECTRICAL",
                vec![[500.0, 150.0], [700.0, 150.0], [700.0, 400.0], [500.0, 400.0]],
                35,
            )
            .with_label("ELECTRICAL AREA")
            .with_color(DisplayColor::ORANGE)
            .with_description("High voltage equipment"),
            ZoneSpec::new(
                "CHEMICAL",
                vec![[100.0, 100.0], [250.0, 100.0], [250.0, 300.0], [100.0, 300.0]],
                30,
            )
            .with_label("CHEMICAL STORAGE")
            .with_color(DisplayColor::YELLOW)
            .with_description("Hazardous materials area"),
        ]
    }
}

/// A validated, immutable danger zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Zone {
    name: String,
    label: String,
    vertices: Vec<Point>,
    base_risk: u8,
    color: DisplayColor,
    description: String,
}

impl Zone {
    /// Validate a zone spec.
    ///
    /// Fails with [`RiskError::InvalidGeometry`] for fewer than three vertices
    /// or non-finite coordinates, and with [`RiskError::Config`] for a base
    /// risk above [`MAX_ZONE_BASE_RISK`].
    pub fn from_spec(spec: &ZoneSpec) -> Result<Self> {
        if spec.name.trim().is_empty() {
            return Err(RiskError::Config("zone name must not be empty".into()));
        }
        if spec.vertices.len() < 3 {
            return Err(RiskError::InvalidGeometry {
                zone: spec.name.clone(),
                reason: format!("polygon needs at least 3 vertices, got {}", spec.vertices.len()),
            });
        }

        let vertices: Vec<Point> = spec.vertices.iter().copied().map(Point::from).collect();
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(RiskError::InvalidGeometry {
                zone: spec.name.clone(),
                reason: format!("non-finite vertex ({}, {})", bad.x, bad.y),
            });
        }

        if spec.base_risk > MAX_ZONE_BASE_RISK {
            return Err(RiskError::Config(format!(
                "zone '{}' base risk {} exceeds {}",
                spec.name, spec.base_risk, MAX_ZONE_BASE_RISK
            )));
        }

        Ok(Self {
            name: spec.name.clone(),
            label: spec.label.clone().unwrap_or_else(|| spec.name.clone()),
            vertices,
            base_risk: spec.base_risk,
            color: spec.color,
            description: spec.description.clone(),
        })
    }

    /// Zone key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overlay label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Polygon vertices in declaration order
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Base risk contribution
    pub fn base_risk(&self) -> u8 {
        self.base_risk
    }

    /// Overlay color
    pub fn color(&self) -> DisplayColor {
        self.color
    }

    /// Description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Check whether a point lies inside the polygon.
    ///
    /// Points on an edge or vertex count as inside.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[j];
            if on_segment(point, a, b) {
                return true;
            }
            if ((a.y > point.y) != (b.y > point.y))
                && (point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Polygon area (shoelace formula)
    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.vertices[i].x * self.vertices[j].y;
            area -= self.vertices[j].x * self.vertices[i].y;
        }
        (area / 2.0).abs()
    }

    /// Vertex centroid, used as a label anchor
    pub fn centroid(&self) -> Point {
        let n = self.vertices.len() as f64;
        let sum_x: f64 = self.vertices.iter().map(|v| v.x).sum();
        let sum_y: f64 = self.vertices.iter().map(|v| v.y).sum();
        Point::new(sum_x / n, sum_y / n)
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }
    p.x >= a.x.min(b.x) - EDGE_EPSILON
        && p.x <= a.x.max(b.x) + EDGE_EPSILON
        && p.y >= a.y.min(b.y) - EDGE_EPSILON
        && p.y <= a.y.max(b.y) + EDGE_EPSILON
}

/// Result of classifying a position against the zone index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneMatch {
    /// Whether the position is inside any danger zone
    pub in_zone: bool,
    /// Name of the matching zone, or [`SAFE_ZONE_LABEL`]
    pub zone_name: String,
    /// Base risk of the matching zone (0 outside)
    pub base_risk: u8,
}

impl ZoneMatch {
    /// Match for a position outside every zone
    pub fn safe() -> Self {
        Self {
            in_zone: false,
            zone_name: SAFE_ZONE_LABEL.to_string(),
            base_risk: 0,
        }
    }

    fn inside(zone: &Zone) -> Self {
        Self {
            in_zone: true,
            zone_name: zone.name.clone(),
            base_risk: zone.base_risk,
        }
    }
}

/// Ordered, immutable set of danger zones.
///
/// Classification is first-match in declaration order; overlapping zones are
/// never resolved by picking the highest risk.
#[derive(Debug, Clone, Default)]
pub struct ZoneIndex {
    zones: Vec<Zone>,
}

impl ZoneIndex {
    /// An index with no zones; every position classifies as safe
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build and validate an index from zone specs
    pub fn from_specs(specs: &[ZoneSpec]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut zones = Vec::with_capacity(specs.len());

        for spec in specs {
            let zone = Zone::from_spec(spec)?;
            if zone.name == SAFE_ZONE_LABEL {
                return Err(RiskError::Config(format!(
                    "zone name '{}' is reserved",
                    SAFE_ZONE_LABEL
                )));
            }
            if !seen.insert(zone.name.clone()) {
                return Err(RiskError::Config(format!("duplicate zone name '{}'", zone.name)));
            }
            zones.push(zone);
        }

        tracing::debug!(zones = zones.len(), "Zone index loaded");
        Ok(Self { zones })
    }

    /// Classify a position.
    ///
    /// Pure: the same point and index always produce the same match.
    pub fn classify(&self, point: Point) -> ZoneMatch {
        if !point.is_finite() {
            return ZoneMatch::safe();
        }
        self.zones
            .iter()
            .find(|zone| zone.contains(point))
            .map(ZoneMatch::inside)
            .unwrap_or_else(ZoneMatch::safe)
    }

    /// Look up a zone by name
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// Zones in priority order
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// True when no zones are configured
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
