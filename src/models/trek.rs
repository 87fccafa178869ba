use bson::Bson;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::review::Review;

/// A scalar that organizers have stored both as numbers and as text
/// (`"12"`, `12`, `12.0`). Kept as-is until the view boundary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FlexValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FlexValue {
    /// Mirrors the falsy check the front end applies before substituting a default.
    pub fn is_present(&self) -> bool {
        match self {
            FlexValue::Int(n) => *n != 0,
            FlexValue::Float(f) => *f != 0.0 && !f.is_nan(),
            FlexValue::Text(s) => !s.is_empty(),
        }
    }

    pub fn to_display(&self) -> String {
        match self {
            FlexValue::Int(n) => n.to_string(),
            FlexValue::Float(f) => format_number(*f),
            FlexValue::Text(s) => s.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexValue::Int(n) => Some(*n as f64),
            FlexValue::Float(f) => Some(*f),
            FlexValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Whole numbers render without a fractional part, like JS template strings.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEntry {
    #[serde(default, deserialize_with = "lenient::day_number")]
    pub day: u32,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub elevation: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub accommodation: Option<String>,
}

/// A trek as it sits in the `treks` collection. Every field is optional and
/// read leniently; defaults are applied once when building a [`TrekView`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrekDocument {
    #[serde(deserialize_with = "lenient::optional")]
    pub id: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub detailed_description: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub price: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub days: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub difficulty: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub season: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub rating: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub reviews: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub capacity: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub altitude: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub image_urls: Option<Vec<Bson>>,
    #[serde(deserialize_with = "lenient::list")]
    pub itinerary: Option<Vec<ItineraryEntry>>,
    #[serde(deserialize_with = "lenient::list")]
    pub highlights: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::list")]
    pub included: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::list")]
    pub excluded: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient::list")]
    pub available_months: Option<Vec<i64>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub organizer_id: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub organizer_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub organizer_verified: Option<bool>,
    #[serde(deserialize_with = "lenient::optional")]
    pub organizer_trek_count: Option<FlexValue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub organizer_description: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub organizer_experience: Option<FlexValue>,
}

impl TrekDocument {
    /// `title`, then the legacy `name` field.
    pub fn display_name(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }

    /// Gallery candidates: only non-empty string entries survive.
    pub fn image_url_list(&self) -> Vec<String> {
        self.image_urls
            .iter()
            .flatten()
            .filter_map(|b| match b {
                Bson::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchStrategy {
    PrimaryKey,
    IdField,
    Scan,
}

/// How the trek shown to the user was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ResolutionState {
    Resolved {
        #[serde(rename = "matchedBy")]
        matched_by: MatchStrategy,
    },
    Fallback,
    TimedOut,
}

impl ResolutionState {
    pub fn is_authoritative(&self) -> bool {
        matches!(self, ResolutionState::Resolved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerSummary {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trek_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AltitudeDisplay {
    pub feet: i64,
    pub meters: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthInfo {
    pub month: u32,
    pub name: &'static str,
    pub season: &'static str,
    pub temperature: &'static str,
    pub crowd: &'static str,
    pub available: bool,
    pub peak: bool,
}

/// The fully-defaulted trek handed to presentation and to the booking hand-off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrekView {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    pub image: String,
    pub images: Vec<String>,
    pub days: u32,
    pub price: String,
    pub numeric_price: f64,
    pub difficulty: String,
    pub location: String,
    pub country: String,
    pub season: String,
    pub rating: f64,
    pub capacity: String,
    pub altitude: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude_display: Option<AltitudeDisplay>,
    pub itinerary: Vec<ItineraryEntry>,
    pub highlights: Vec<String>,
    pub included: Vec<String>,
    pub excluded: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub best_time_to_visit: Vec<MonthInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<OrganizerSummary>,
    pub reviews: Vec<Review>,
    pub resolution: ResolutionState,
    /// Raw values the booking record copies through; absent stays absent.
    #[serde(skip)]
    pub source: TrekDocument,
}
