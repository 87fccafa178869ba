use bson::DateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogDocument {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub difficulty: Option<String>,
    pub distance: Option<String>,
    pub altitude: Option<String>,
    pub best_season: Option<String>,
    pub location: Option<String>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub created_at: Option<DateTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    pub difficulty: Option<String>,
    pub distance: Option<String>,
    pub altitude: Option<String>,
    pub best_season: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogView {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub author_id: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl BlogView {
    pub fn from_document(id: String, blog: BlogDocument) -> Self {
        Self {
            id,
            title: blog.title.unwrap_or_default(),
            summary: blog.summary.unwrap_or_default(),
            content: blog.content.unwrap_or_default(),
            image_url: blog.image_url.unwrap_or_default(),
            difficulty: blog.difficulty,
            distance: blog.distance,
            altitude: blog.altitude,
            best_season: blog.best_season,
            location: blog.location,
            author_id: blog.author_id.unwrap_or_else(|| "anonymous".to_string()),
            author_name: blog.author_name.unwrap_or_else(|| "Guest Explorer".to_string()),
            created_at: blog.created_at.and_then(|d| d.try_to_rfc3339_string().ok()),
        }
    }
}
