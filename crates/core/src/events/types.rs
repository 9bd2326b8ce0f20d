use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted after successful content mutations, consumed by SSE listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentEvent {
    Welcome,
    #[serde(rename_all = "camelCase")]
    ArticleCreated {
        article_id: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    ArticleUpdated {
        article_id: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    ArticleDeleted {
        article_id: String,
        removed_comments: usize,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    CommentCreated {
        article_id: String,
        comment_id: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    CommentDeleted {
        article_id: String,
        comment_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl ContentEvent {
    /// Article the event concerns, if any.
    pub fn article_id(&self) -> Option<&str> {
        match self {
            ContentEvent::Welcome => None,
            ContentEvent::ArticleCreated { article_id, .. }
            | ContentEvent::ArticleUpdated { article_id, .. }
            | ContentEvent::ArticleDeleted { article_id, .. }
            | ContentEvent::CommentCreated { article_id, .. }
            | ContentEvent::CommentDeleted { article_id, .. } => Some(article_id),
        }
    }
}
