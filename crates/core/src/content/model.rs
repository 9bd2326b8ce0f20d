use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Article record stored under `article:{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment record stored under `comment:{articleId}:{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an article. Missing text fields deserialize as empty
/// and are rejected by validation rather than by the JSON layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Partial update for an article.
///
/// Media URLs use a double option: `None` when the field is absent,
/// `Some(None)` for an explicit `null`, `Some(Some(url))` otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub video_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub audio_url: Option<Option<String>>,
}

/// Payload for creating a comment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Only called when the field is present, so wrap whatever was there.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn article_serializes_camel_case_with_null_media() {
        let now = Utc::now();
        let article = Article {
            id: "a1".into(),
            title: "T".into(),
            content: "C".into(),
            excerpt: "C...".into(),
            image_url: None,
            video_url: Some("https://v".into()),
            audio_url: None,
            author_id: "u1".into(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["authorId"], json!("u1"));
        assert_eq!(value["imageUrl"], json!(null));
        assert_eq!(value["videoUrl"], json!("https://v"));
        assert!(value.get("createdAt").is_some());

        let back: Article = serde_json::from_value(value).unwrap();
        assert_eq!(back, article);
    }

    #[test]
    fn patch_distinguishes_absent_null_and_value() {
        let patch: ArticlePatch = serde_json::from_value(json!({
            "title": "new",
            "imageUrl": null,
            "videoUrl": "https://example.com/v.mp4",
        }))
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("new"));
        assert_eq!(patch.content, None);
        assert_eq!(patch.image_url, Some(None));
        assert_eq!(
            patch.video_url,
            Some(Some("https://example.com/v.mp4".to_string()))
        );
        assert_eq!(patch.audio_url, None);
    }

    #[test]
    fn new_article_tolerates_missing_fields() {
        let input: NewArticle = serde_json::from_value(json!({"title": "only"})).unwrap();
        assert_eq!(input.title, "only");
        assert_eq!(input.content, "");
        assert_eq!(input.excerpt, None);
    }
}
