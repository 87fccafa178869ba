use regex::Regex;
use std::sync::OnceLock;

use crate::models::{
    review::Review,
    trek::{
        AltitudeDisplay, ItineraryEntry, MonthInfo, OrganizerSummary, ResolutionState,
        TrekDocument, TrekView,
    },
};
use crate::services::{
    content_generation_service::{
        excluded_items, generate_highlights, generate_itinerary, included_items, MAX_TREK_DAYS,
    },
    image_service::{get_valid_image_url, valid_gallery},
    pricing_service::PricingService,
};

pub const DEFAULT_TITLE: &str = "Mountain Trek";
pub const DEFAULT_DESCRIPTION: &str =
    "Experience this amazing mountain trek through beautiful landscapes.";
pub const DEFAULT_DIFFICULTY: &str = "Moderate";
pub const DEFAULT_LOCATION: &str = "Mountain Region";
pub const DEFAULT_SEASON: &str = "Year-round";
pub const DEFAULT_COUNTRY: &str = "Nepal";
pub const DEFAULT_RATING: f64 = 5.0;
pub const DEFAULT_CAPACITY: &str = "10";
pub const DEFAULT_ALTITUDE: &str = "3,000m";

const FEET_PER_METER: f64 = 3.28084;

struct MonthMeta {
    name: &'static str,
    season: &'static str,
    temperature: &'static str,
    crowd: &'static str,
}

const MONTHS: [MonthMeta; 12] = [
    MonthMeta { name: "January", season: "Winter", temperature: "-5°C to 10°C", crowd: "Low" },
    MonthMeta { name: "February", season: "Winter", temperature: "-2°C to 12°C", crowd: "Low" },
    MonthMeta { name: "March", season: "Spring", temperature: "5°C to 18°C", crowd: "Moderate" },
    MonthMeta { name: "April", season: "Spring", temperature: "10°C to 22°C", crowd: "High" },
    MonthMeta { name: "May", season: "Summer", temperature: "15°C to 25°C", crowd: "High" },
    MonthMeta { name: "June", season: "Monsoon", temperature: "18°C to 24°C", crowd: "Low" },
    MonthMeta { name: "July", season: "Monsoon", temperature: "17°C to 23°C", crowd: "Low" },
    MonthMeta { name: "August", season: "Monsoon", temperature: "16°C to 22°C", crowd: "Moderate" },
    MonthMeta { name: "September", season: "Autumn", temperature: "10°C to 20°C", crowd: "High" },
    MonthMeta { name: "October", season: "Autumn", temperature: "5°C to 18°C", crowd: "High" },
    MonthMeta { name: "November", season: "Winter", temperature: "0°C to 15°C", crowd: "Moderate" },
    MonthMeta { name: "December", season: "Winter", temperature: "-5°C to 10°C", crowd: "Low" },
];

fn first_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static pattern"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn non_empty_list<T: Clone>(value: Option<&Vec<T>>) -> Option<Vec<T>> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Altitude in both units. A value mentioning `m` but not `ft` is taken as
/// metres; anything else is feet.
pub fn altitude_display(raw: &str) -> Option<AltitudeDisplay> {
    let normalized = raw.to_lowercase().replace(',', "");
    let value: f64 = first_integer().find(&normalized)?.as_str().parse().ok()?;
    let is_meters = normalized.contains('m') && !normalized.contains("ft");

    let (feet, meters) = if is_meters {
        ((value * FEET_PER_METER).round(), value)
    } else {
        (value, (value / FEET_PER_METER).round())
    };

    Some(AltitudeDisplay {
        feet: feet as i64,
        meters: meters as i64,
    })
}

/// Month table for the best-time-to-visit panel. `available` holds 0-based
/// month indexes; an empty list yields no table.
pub fn best_time_to_visit(available: &[i64]) -> Vec<MonthInfo> {
    if available.is_empty() {
        return Vec::new();
    }

    MONTHS
        .iter()
        .enumerate()
        .map(|(index, meta)| {
            let is_available = available.contains(&(index as i64));
            let peak = is_available
                && (meta.crowd == "High" || meta.season == "Autumn" || meta.season == "Spring");
            MonthInfo {
                month: index as u32,
                name: meta.name,
                season: meta.season,
                temperature: meta.temperature,
                crowd: meta.crowd,
                available: is_available,
                peak,
            }
        })
        .collect()
}

/// Up to two leading letters of the organizer's name, upper-cased.
pub fn organizer_initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

fn organizer_summary(trek: &TrekDocument) -> Option<OrganizerSummary> {
    let id = non_empty(trek.organizer_id.as_deref())?;
    let name = non_empty(trek.organizer_name.as_deref())?;

    Some(OrganizerSummary {
        id: id.to_string(),
        name: name.to_string(),
        initials: organizer_initials(name),
        verified: trek.organizer_verified.unwrap_or(false),
        trek_count: trek.organizer_trek_count.as_ref().map(|c| c.to_display()),
        description: trek.organizer_description.clone(),
        experience: trek.organizer_experience.as_ref().map(|e| e.to_display()),
    })
}

/// Day numbers missing from stored entries are filled from their position.
fn number_days(mut itinerary: Vec<ItineraryEntry>) -> Vec<ItineraryEntry> {
    for (i, entry) in itinerary.iter_mut().enumerate() {
        if entry.day == 0 {
            entry.day = i as u32 + 1;
        }
    }
    itinerary
}

pub fn trek_days(trek: &TrekDocument) -> u32 {
    trek.days
        .as_ref()
        .and_then(|d| d.as_f64())
        .filter(|d| d.is_finite() && *d >= 1.0)
        .map(|d| d.floor().min(MAX_TREK_DAYS as f64) as u32)
        .unwrap_or(1)
}

/// Apply every default once, producing the record presentation and booking
/// read from.
pub fn build_trek_view(
    id: &str,
    trek: TrekDocument,
    reviews: Vec<Review>,
    resolution: ResolutionState,
) -> TrekView {
    let title = trek.display_name().unwrap_or(DEFAULT_TITLE).to_string();
    let days = trek_days(&trek);
    let images = valid_gallery(&trek.image_url_list());
    let image = match non_empty(trek.image.as_deref()) {
        Some(image) => get_valid_image_url(Some(image)),
        None => images
            .first()
            .cloned()
            .unwrap_or_else(|| get_valid_image_url(None)),
    };

    let altitude = trek
        .altitude
        .as_ref()
        .filter(|a| a.is_present())
        .map(|a| a.to_display())
        .unwrap_or_else(|| DEFAULT_ALTITUDE.to_string());

    let rating = trek
        .rating
        .as_ref()
        .filter(|r| r.is_present())
        .and_then(|r| r.as_f64())
        .map(|r| r.clamp(0.0, 5.0))
        .unwrap_or(DEFAULT_RATING);

    TrekView {
        id: id.to_string(),
        description: non_empty(trek.description.as_deref())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string(),
        detailed_description: trek.detailed_description.clone(),
        image,
        images,
        days,
        price: PricingService::format_price(trek.price.as_ref()),
        numeric_price: PricingService::numeric_price(trek.price.as_ref()),
        difficulty: non_empty(trek.difficulty.as_deref())
            .unwrap_or(DEFAULT_DIFFICULTY)
            .to_string(),
        location: non_empty(trek.location.as_deref())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string(),
        country: non_empty(trek.country.as_deref())
            .unwrap_or(DEFAULT_COUNTRY)
            .to_string(),
        season: non_empty(trek.season.as_deref())
            .unwrap_or(DEFAULT_SEASON)
            .to_string(),
        rating,
        capacity: trek
            .capacity
            .as_ref()
            .filter(|c| c.is_present())
            .map(|c| c.to_display())
            .unwrap_or_else(|| DEFAULT_CAPACITY.to_string()),
        altitude_display: altitude_display(&altitude),
        altitude,
        itinerary: non_empty_list(trek.itinerary.as_ref())
            .map(number_days)
            .unwrap_or_else(|| generate_itinerary(days, &title)),
        highlights: non_empty_list(trek.highlights.as_ref())
            .unwrap_or_else(|| generate_highlights(&title)),
        included: non_empty_list(trek.included.as_ref()).unwrap_or_else(included_items),
        excluded: non_empty_list(trek.excluded.as_ref()).unwrap_or_else(excluded_items),
        best_time_to_visit: best_time_to_visit(trek.available_months.as_deref().unwrap_or(&[])),
        organizer: organizer_summary(&trek),
        reviews,
        resolution,
        title,
        source: trek,
    }
}
