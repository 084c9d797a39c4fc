//! Route data: navigation steps, maneuver tags and routing preferences

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance text carried by the terminal step of every route
pub const ARRIVAL_DISTANCE: &str = "0 meters";

/// Marker shown for maneuver tags outside the known set
pub const DEFAULT_MARKER: &str = "•";

/// Symbolic maneuver type used to pick a visual marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maneuver {
    Right,
    Left,
    Straight,
    Roundabout,
    Destination,
    /// Any tag we don't recognize; rendered with the default marker
    #[serde(other)]
    Unknown,
}

impl Maneuver {
    /// Parse a maneuver tag, falling back to `Unknown` instead of failing
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "right" => Maneuver::Right,
            "left" => Maneuver::Left,
            "straight" => Maneuver::Straight,
            "roundabout" => Maneuver::Roundabout,
            "destination" => Maneuver::Destination,
            _ => Maneuver::Unknown,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Maneuver::Right => "→",
            Maneuver::Left => "←",
            Maneuver::Straight => "↑",
            Maneuver::Roundabout => "⟲",
            Maneuver::Destination => "🏁",
            Maneuver::Unknown => DEFAULT_MARKER,
        }
    }
}

/// Kind of intersection the step takes place at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionType {
    Roundabout,
    Destination,
    /// Also the fallback for unrecognized tags
    #[default]
    #[serde(other)]
    Standard,
}

impl IntersectionType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "roundabout" => IntersectionType::Roundabout,
            "destination" => IntersectionType::Destination,
            _ => IntersectionType::Standard,
        }
    }
}

/// One instruction in a fixed route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationStep {
    pub instruction: String,
    pub street: String,
    pub distance: String,
    pub arrow: Maneuver,
    /// Accessibility note: surface texture, signage, crossing aids
    pub path_description: String,
    /// Empty when there is no lane guidance to show
    #[serde(default)]
    pub lane_guidance: String,
    #[serde(default)]
    pub intersection_type: IntersectionType,
}

impl NavigationStep {
    pub fn new(
        instruction: impl Into<String>,
        street: impl Into<String>,
        distance: impl Into<String>,
        arrow: Maneuver,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            street: street.into(),
            distance: distance.into(),
            arrow,
            path_description: String::new(),
            lane_guidance: String::new(),
            intersection_type: IntersectionType::Standard,
        }
    }

    pub fn with_path_description(mut self, description: impl Into<String>) -> Self {
        self.path_description = description.into();
        self
    }

    pub fn with_lane_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.lane_guidance = guidance.into();
        self
    }

    pub fn with_intersection(mut self, intersection_type: IntersectionType) -> Self {
        self.intersection_type = intersection_type;
        self
    }

    pub fn has_lane_guidance(&self) -> bool {
        !self.lane_guidance.trim().is_empty()
    }

    pub fn is_destination(&self) -> bool {
        self.arrow == Maneuver::Destination && self.distance == ARRIVAL_DISTANCE
    }
}

/// Errors building a route
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route has no steps")]
    Empty,
    #[error("last step must be a destination at \"0 meters\", got {arrow:?} at {distance:?}")]
    MissingDestination { arrow: Maneuver, distance: String },
}

/// A non-empty step sequence whose last step is the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    steps: Vec<NavigationStep>,
}

impl Route {
    pub fn new(steps: Vec<NavigationStep>) -> Result<Self, RouteError> {
        let last = steps.last().ok_or(RouteError::Empty)?;
        if !last.is_destination() {
            return Err(RouteError::MissingDestination {
                arrow: last.arrow,
                distance: last.distance.clone(),
            });
        }
        Ok(Self { steps })
    }

    /// The built-in walking route to the community center
    pub fn demo() -> Self {
        Self {
            steps: vec![
                NavigationStep::new("Turn right", "Main Street", "200 meters", Maneuver::Right)
                    .with_path_description("Wide sidewalk with tactile paving and good lighting")
                    .with_lane_guidance("Move to the rightmost lane before turning"),
                NavigationStep::new(
                    "Continue straight",
                    "Main Street",
                    "400 meters",
                    Maneuver::Straight,
                )
                .with_path_description(
                    "Pedestrian crossing with audible signal and countdown timer",
                )
                .with_lane_guidance("Stay in current lane"),
                NavigationStep::new(
                    "Take the second exit",
                    "Park Avenue",
                    "150 meters",
                    Maneuver::Roundabout,
                )
                .with_path_description("Roundabout with pedestrian islands and clear signage")
                .with_lane_guidance("Use the right lane to take the second exit")
                .with_intersection(IntersectionType::Roundabout),
                NavigationStep::new("Turn left", "Oak Street", "300 meters", Maneuver::Left)
                    .with_path_description("Crosswalk with countdown timer and accessible ramp")
                    .with_lane_guidance("Move to the leftmost lane before turning"),
                NavigationStep::new(
                    "You have arrived",
                    "Community Center",
                    ARRIVAL_DISTANCE,
                    Maneuver::Destination,
                )
                .with_path_description("Accessible entrance with ramp and automatic doors")
                .with_intersection(IntersectionType::Destination),
            ],
        }
    }

    pub fn steps(&self) -> &[NavigationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for the `len` convention
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&NavigationStep> {
        self.steps.get(index)
    }

    /// Street of the terminal step
    pub fn destination(&self) -> &str {
        &self.steps[self.last_index()].street
    }
}

/// Routing flags, fixed for the whole session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePreferences {
    pub avoid_tolls: bool,
    pub avoid_highways: bool,
    pub prefer_accessible_paths: bool,
}

impl Default for RoutePreferences {
    fn default() -> Self {
        Self {
            avoid_tolls: false,
            avoid_highways: false,
            prefer_accessible_paths: true,
        }
    }
}

impl RoutePreferences {
    pub fn route_type_label(&self) -> &'static str {
        if self.prefer_accessible_paths {
            "Accessible Route"
        } else {
            "Standard Route"
        }
    }
}
