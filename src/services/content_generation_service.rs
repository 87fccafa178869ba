use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::models::{
    review::Review,
    trek::{FlexValue, ItineraryEntry, TrekDocument},
};

const ACTIVITY_POOL: [&str; 10] = [
    "Start with an early morning hike through mountain trails",
    "Explore local landmarks and scenic viewpoints",
    "Trek through diverse mountain paths with stunning views",
    "Visit natural hot springs and mountain villages",
    "Cross suspension bridges over deep valleys",
    "Camp beside crystal clear alpine lakes",
    "Reach panoramic viewpoints at high altitudes",
    "Descend through ancient forest trails",
    "Discover hidden waterfalls and wildlife",
    "Visit traditional villages and return to base",
];

const PLACEHOLDER_DIFFICULTIES: [&str; 3] = ["Easy", "Moderate", "Difficult"];

const SAMPLE_REVIEWERS: [&str; 5] = ["John D.", "Sarah M.", "Michael T.", "Emily R.", "David L."];
const SAMPLE_REVIEW_DATES: [&str; 5] = [
    "2 months ago",
    "3 weeks ago",
    "5 months ago",
    "1 month ago",
    "2 weeks ago",
];

pub const SAMPLE_REVIEW_COUNT: usize = 5;

/// `"valley-of-flowers"` becomes `"Valley Of Flowers"`. Only the first letter
/// of each word changes.
pub fn title_from_identifier(identifier: &str) -> String {
    identifier
        .replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// One entry per day. The first and last days get their own framing and the
/// days in between cycle through the activity pool.
/// Longest trek the view will describe day by day.
pub const MAX_TREK_DAYS: u32 = 365;

pub fn generate_itinerary(days: u32, title: &str) -> Vec<ItineraryEntry> {
    let days = days.min(MAX_TREK_DAYS);
    (0..days)
        .map(|i| {
            let day = i + 1;
            let title = if i == 0 {
                format!("Begin the {} adventure", title)
            } else if day == days {
                "Final day and return journey".to_string()
            } else {
                format!("Day {}: Mountain exploration", day)
            };

            ItineraryEntry {
                day,
                title,
                description: ACTIVITY_POOL[i as usize % ACTIVITY_POOL.len()].to_string(),
                ..Default::default()
            }
        })
        .collect()
}

pub fn generate_highlights(title: &str) -> Vec<String> {
    vec![
        format!("Spectacular views from {} peaks", title),
        "Diverse mountain flora and wildlife".to_string(),
        "Expert guides and safety equipment".to_string(),
        "Comfortable mountain accommodations".to_string(),
        "Cultural immersion with local communities".to_string(),
        "Authentic mountain cuisine".to_string(),
        "Photography opportunities".to_string(),
        "Adventure activities and exploration".to_string(),
    ]
}

pub fn included_items() -> Vec<String> {
    [
        "Professional mountain guide",
        "All accommodation during trek",
        "Meals as per itinerary",
        "Transportation during trek",
        "Entry fees and permits",
        "Safety equipment provided",
        "First aid and emergency support",
        "Trekking insurance coverage",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn excluded_items() -> Vec<String> {
    [
        "International flights",
        "Personal travel insurance",
        "Personal expenses and tips",
        "Alcoholic beverages",
        "Personal equipment rental",
        "Emergency evacuation costs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Canned reviews shown until real ones are fetched. Ratings alternate 4 and 5.
pub fn sample_reviews(trek_title: &str) -> Vec<Review> {
    let texts = [
        format!("Amazing experience! {} exceeded all my expectations. The guides were knowledgeable and the views were breathtaking.", trek_title),
        format!("{} was the highlight of our vacation. Challenging at times but absolutely worth every step. Would highly recommend!", trek_title),
        "Beautiful trek through diverse landscapes. The organization was perfect and everything went smoothly.".to_string(),
        "Good trek overall. Some parts were more difficult than advertised, but the scenery made up for it.".to_string(),
        format!("Unforgettable journey through {}. The local food and camping spots were fantastic. Can't wait to come back!", trek_title),
    ];

    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| Review {
            id: format!("rev-{}", i),
            trek_id: None,
            author: Some(SAMPLE_REVIEWERS[i].to_string()),
            date: Some(SAMPLE_REVIEW_DATES[i].to_string()),
            rating: Some(FlexValue::Int(4 + (i as i64 % 2))),
            text: Some(text),
        })
        .collect()
}

fn seed_for(identifier: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    identifier.hash(&mut hasher);
    hasher.finish()
}

/// A stand-in trek for an identifier nothing in the store matches. Values are
/// random within fixed ranges but stable for a given identifier, so repeated
/// views of the same missing trek agree. Returns `None` when the identifier
/// carries nothing to build a title from.
pub fn placeholder_trek(identifier: &str) -> Option<TrekDocument> {
    if identifier.trim().is_empty() {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed_for(identifier));
    let title = title_from_identifier(identifier);

    let days = rng.gen_range(3..=10);
    let difficulty = PLACEHOLDER_DIFFICULTIES[rng.gen_range(0..PLACEHOLDER_DIFFICULTIES.len())];
    let price = rng.gen_range(3000..=11999);
    let rating = (rng.gen_range(3.5..5.0_f64) * 10.0).round() / 10.0;
    let review_count = rng.gen_range(10..=109);
    let capacity = rng.gen_range(5..=19);
    let altitude = rng.gen_range(1000..=4999);

    Some(TrekDocument {
        id: Some(FlexValue::Text(identifier.to_string())),
        description: Some(format!(
            "Experience the beautiful {} trek with stunning views and challenging paths. This adventure will take you through diverse landscapes and provide unforgettable memories.",
            title
        )),
        image: Some(format!(
            "https://source.unsplash.com/1600x900/?mountains,trek,{}",
            identifier.replace('-', "+")
        )),
        days: Some(FlexValue::Int(days)),
        difficulty: Some(difficulty.to_string()),
        location: Some("Mountain Region".to_string()),
        country: Some("Nepal".to_string()),
        season: Some("Year-round".to_string()),
        price: Some(FlexValue::Text(format!("₹{}", price))),
        rating: Some(FlexValue::Float(rating)),
        reviews: Some(FlexValue::Int(review_count)),
        capacity: Some(FlexValue::Text(capacity.to_string())),
        altitude: Some(FlexValue::Text(format!("{}m", altitude))),
        title: Some(title),
        ..Default::default()
    })
}
