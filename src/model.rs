//! Data models for the cable tray fill engine.
//!
//! - `CableSpec`: an immutable cable description supplied by the caller
//! - `PlacedCable`: a cable with its resting position inside one tray
//!
//! Both structures implement the traits from the `types` module.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::{Circular, Point2, validation};

/// Validation error for cable data and solve parameters.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid diameter: {0}")]
    InvalidDiameter(String),
    #[error("Invalid cable identity: {0}")]
    InvalidIdentity(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// A cable to be laid into a tray.
///
/// # Fields
/// * `id` - Unique identifier of the cable
/// * `name` - Display name
/// * `cable_type` - Cable type designation (serialized as `type`)
/// * `diameter` - Outer diameter in mm (accepts `od` on input)
/// * `system` - Optional system group, primary placement sort key
/// * `from_node` / `to_node` - Optional routing endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "P-101",
    "name": "Main feeder",
    "type": "MY4",
    "diameter": 18.5,
    "system": "POWER",
    "fromNode": "ER-01",
    "toNode": "SWBD-02"
}))]
pub struct CableSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub cable_type: String,
    #[serde(alias = "od")]
    pub diameter: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_node: Option<String>,
}

impl CableSpec {
    /// Creates a new cable with validation.
    ///
    /// # Examples
    /// ```
    /// use tray_fill::model::CableSpec;
    ///
    /// assert!(CableSpec::new("C1", 12.0).is_ok());
    /// assert!(CableSpec::new("C1", -3.0).is_err());
    /// assert!(CableSpec::new("", 12.0).is_err());
    /// ```
    pub fn new(id: impl Into<String>, diameter: f64) -> Result<Self, ValidationError> {
        let cable = Self {
            id: id.into(),
            name: String::new(),
            cable_type: String::new(),
            diameter,
            system: None,
            from_node: None,
            to_node: None,
        };
        cable.validate()?;
        Ok(cable)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the cable type designation.
    pub fn with_type(mut self, cable_type: impl Into<String>) -> Self {
        self.cable_type = cable_type.into();
        self
    }

    /// Sets the system group.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Sets the routing endpoints.
    pub fn with_route(mut self, from_node: impl Into<String>, to_node: impl Into<String>) -> Self {
        self.from_node = Some(from_node.into());
        self.to_node = Some(to_node.into());
        self
    }

    /// Checks identity and diameter. Used for deserialized input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidIdentity(
                "Cable id must not be empty".to_string(),
            ));
        }
        validation::validate_length(self.diameter, &format!("Diameter of cable '{}'", self.id))
            .map_err(ValidationError::InvalidDiameter)
    }
}

impl Circular for CableSpec {
    fn diameter(&self) -> f64 {
        self.diameter
    }
}

/// Placement ordering: system ascending, diameter descending, from-node ascending.
///
/// Missing keys sort as empty strings. The sort is stable.
pub fn placement_order(a: &CableSpec, b: &CableSpec) -> Ordering {
    let sys_a = a.system.as_deref().unwrap_or("");
    let sys_b = b.system.as_deref().unwrap_or("");
    sys_a
        .cmp(sys_b)
        .then_with(|| b.diameter.total_cmp(&a.diameter))
        .then_with(|| {
            a.from_node
                .as_deref()
                .unwrap_or("")
                .cmp(b.from_node.as_deref().unwrap_or(""))
        })
}

/// Returns a copy of `cables` sorted by [`placement_order`] (stable).
pub fn sorted_for_placement(cables: &[CableSpec]) -> Vec<CableSpec> {
    let mut sorted = cables.to_vec();
    sorted.sort_by(placement_order);
    sorted
}

/// Total cross-sectional area of a cable set.
pub fn total_cable_area(cables: &[CableSpec]) -> f64 {
    cables.iter().map(|c| c.cross_section_area()).sum()
}

/// Sum of the outer diameters of a cable set.
pub fn total_diameter_sum(cables: &[CableSpec]) -> f64 {
    cables.iter().map(|c| c.diameter).sum()
}

/// A cable resting at its final position inside a tray.
///
/// # Fields
/// * `cable` - The original cable (flattened on the wire)
/// * `center` - Center of the cross-section, `y = 0` is the tray floor
/// * `layer` - Stacking layer, 1 = on the floor
/// * `placement_order` - 1-based order in which the placer laid the cable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacedCable {
    #[serde(flatten)]
    pub cable: CableSpec,
    pub center: Point2,
    pub layer: u32,
    pub placement_order: usize,
}

impl PlacedCable {
    /// Creates a new placed cable.
    pub fn new(cable: CableSpec, center: Point2, layer: u32, placement_order: usize) -> Self {
        Self {
            cable,
            center,
            layer,
            placement_order,
        }
    }

    /// Highest point of the cable above the floor.
    #[inline]
    pub fn top_y(&self) -> f64 {
        self.center.y + self.radius()
    }

    /// Lowest point of the cable above the floor.
    #[inline]
    pub fn bottom_y(&self) -> f64 {
        self.center.y - self.radius()
    }

    /// Left edge of the cable.
    #[inline]
    pub fn left_x(&self) -> f64 {
        self.center.x - self.radius()
    }

    /// Right edge of the cable.
    #[inline]
    pub fn right_x(&self) -> f64 {
        self.center.x + self.radius()
    }

    /// Checks whether the cable bottom touches the floor.
    #[inline]
    pub fn rests_on_floor(&self, floor_tolerance: f64) -> bool {
        self.center.y <= self.radius() + floor_tolerance
    }

    /// Identifier of the underlying cable.
    #[inline]
    pub fn id(&self) -> &str {
        &self.cable.id
    }
}

impl Circular for PlacedCable {
    fn diameter(&self) -> f64 {
        self.cable.diameter
    }
}
