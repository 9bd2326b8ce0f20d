use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::keys::{
    article_key, comment_key, comments_prefix, is_valid_id, ContentKey, ARTICLE_PREFIX,
};
use super::model::{Article, ArticlePatch, Comment, NewArticle, NewComment};
use super::validate::{
    advance_timestamp, excerpt_or_derived, is_blank, normalize_url, validate_article_fields,
    validate_comment_fields,
};
use crate::auth::Identity;
use crate::error::{ContentError, ContentResult};
use crate::events::{ContentEvent, EventBus};
use crate::store::{Entry, KvStore};

/// Article and comment operations expressed as key-value store calls.
///
/// Holds no state of its own between calls. Mutations that need a caller take
/// an [`Identity`], so an unauthenticated request cannot reach them.
#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn KvStore>,
    events: EventBus,
}

impl ContentService {
    pub fn new(store: Arc<dyn KvStore>, events: EventBus) -> Self {
        Self { store, events }
    }

    /// All articles, newest first. Equal `createdAt` values fall back to `id`
    /// descending so the order does not depend on scan order.
    pub async fn list_articles(&self) -> ContentResult<Vec<Article>> {
        let mut articles: Vec<Article> = decode_all(self.store.scan_prefix(ARTICLE_PREFIX).await?)?;
        articles.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(articles)
    }

    pub async fn get_article(&self, id: &str) -> ContentResult<Article> {
        self.find_article(id)
            .await?
            .ok_or_else(|| article_not_found(id))
    }

    pub async fn create_article(
        &self,
        caller: &Identity,
        input: NewArticle,
    ) -> ContentResult<Article> {
        validate_article_fields(&input.title, &input.content)?;

        let now = Utc::now();
        let article = Article {
            id: Uuid::now_v7().to_string(),
            excerpt: excerpt_or_derived(input.excerpt, &input.content),
            title: input.title,
            content: input.content,
            image_url: normalize_url(input.image_url),
            video_url: normalize_url(input.video_url),
            audio_url: normalize_url(input.audio_url),
            author_id: caller.user_id.clone(),
            created_at: now,
            updated_at: now,
        };

        self.store
            .set(&article_key(&article.id), serde_json::to_value(&article)?)
            .await?;

        tracing::info!(article_id = %article.id, author_id = %article.author_id, "article created");
        self.events.publish(ContentEvent::ArticleCreated {
            article_id: article.id.clone(),
            timestamp: now,
        });
        Ok(article)
    }

    /// Apply a partial update. Blank text fields keep their previous value;
    /// media URLs distinguish an absent field from an explicit clear.
    pub async fn update_article(
        &self,
        caller: &Identity,
        id: &str,
        patch: ArticlePatch,
    ) -> ContentResult<Article> {
        let mut article = self.get_article(id).await?;

        replace_text(&mut article.title, patch.title);
        replace_text(&mut article.content, patch.content);
        replace_text(&mut article.excerpt, patch.excerpt);
        replace_url(&mut article.image_url, patch.image_url);
        replace_url(&mut article.video_url, patch.video_url);
        replace_url(&mut article.audio_url, patch.audio_url);
        article.updated_at = advance_timestamp(article.updated_at);

        self.store
            .set(&article_key(&article.id), serde_json::to_value(&article)?)
            .await?;

        tracing::info!(article_id = %article.id, editor_id = %caller.user_id, "article updated");
        self.events.publish(ContentEvent::ArticleUpdated {
            article_id: article.id.clone(),
            timestamp: article.updated_at,
        });
        Ok(article)
    }

    /// Remove an article, then every comment filed under it.
    ///
    /// The two steps are separate store calls. Between them the article is gone
    /// while its comments remain, and a comment created concurrently can outlive
    /// the cascade. Both are accepted.
    pub async fn delete_article(&self, caller: &Identity, id: &str) -> ContentResult<usize> {
        let article = self.get_article(id).await?;

        self.store.delete(&article_key(&article.id)).await?;

        let comment_keys: Vec<String> = self
            .store
            .scan_prefix(&comments_prefix(&article.id))
            .await?
            .into_iter()
            .filter(|entry| {
                ContentKey::parse(&entry.key)
                    .is_some_and(|key| key.is_comment() && key.article_id() == article.id)
            })
            .map(|entry| entry.key)
            .collect();
        if !comment_keys.is_empty() {
            self.store.delete_many(&comment_keys).await?;
        }

        tracing::info!(
            article_id = %article.id,
            removed_comments = comment_keys.len(),
            editor_id = %caller.user_id,
            "article deleted"
        );
        self.events.publish(ContentEvent::ArticleDeleted {
            article_id: article.id,
            removed_comments: comment_keys.len(),
            timestamp: Utc::now(),
        });
        Ok(comment_keys.len())
    }

    /// Comments of one article, oldest first. Ties fall back to `id` ascending.
    pub async fn list_comments(&self, article_id: &str) -> ContentResult<Vec<Comment>> {
        if !is_valid_id(article_id) {
            return Ok(Vec::new());
        }
        let mut comments: Vec<Comment> =
            decode_all(self.store.scan_prefix(&comments_prefix(article_id)).await?)?;
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    /// Open to anonymous callers.
    pub async fn create_comment(&self, article_id: &str, input: NewComment) -> ContentResult<Comment> {
        if self.find_article(article_id).await?.is_none() {
            return Err(article_not_found(article_id));
        }
        validate_comment_fields(&input.name, &input.content)?;

        let comment = Comment {
            id: Uuid::now_v7().to_string(),
            article_id: article_id.to_string(),
            name: input.name,
            content: input.content,
            created_at: Utc::now(),
        };

        self.store
            .set(
                &comment_key(article_id, &comment.id),
                serde_json::to_value(&comment)?,
            )
            .await?;

        tracing::info!(article_id = %article_id, comment_id = %comment.id, "comment created");
        self.events.publish(ContentEvent::CommentCreated {
            article_id: comment.article_id.clone(),
            comment_id: comment.id.clone(),
            timestamp: comment.created_at,
        });
        Ok(comment)
    }

    pub async fn delete_comment(
        &self,
        caller: &Identity,
        article_id: &str,
        comment_id: &str,
    ) -> ContentResult<()> {
        let not_found =
            || ContentError::NotFound(format!("comment {comment_id} on article {article_id}"));
        if !is_valid_id(article_id) || !is_valid_id(comment_id) {
            return Err(not_found());
        }

        let key = comment_key(article_id, comment_id);
        if self.store.get(&key).await?.is_none() {
            return Err(not_found());
        }
        self.store.delete(&key).await?;

        tracing::info!(
            article_id = %article_id,
            comment_id = %comment_id,
            moderator_id = %caller.user_id,
            "comment deleted"
        );
        self.events.publish(ContentEvent::CommentDeleted {
            article_id: article_id.to_string(),
            comment_id: comment_id.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn find_article(&self, id: &str) -> ContentResult<Option<Article>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        match self.store.get(&article_key(id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

fn article_not_found(id: &str) -> ContentError {
    ContentError::NotFound(format!("article {id}"))
}

fn decode_all<T: DeserializeOwned>(entries: Vec<Entry>) -> ContentResult<Vec<T>> {
    entries
        .into_iter()
        .map(|entry| serde_json::from_value(entry.value).map_err(ContentError::from))
        .collect()
}

fn replace_text(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        if !is_blank(&value) {
            *field = value;
        }
    }
}

fn replace_url(field: &mut Option<String>, value: Option<Option<String>>) {
    if let Some(value) = value {
        *field = normalize_url(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_text_ignores_absent_and_blank() {
        let mut title = "old".to_string();
        replace_text(&mut title, None);
        replace_text(&mut title, Some("   ".into()));
        assert_eq!(title, "old");

        replace_text(&mut title, Some("new".into()));
        assert_eq!(title, "new");
    }

    #[test]
    fn replace_url_clears_on_null_or_empty() {
        let mut url = Some("https://a".to_string());
        replace_url(&mut url, None);
        assert_eq!(url.as_deref(), Some("https://a"));

        replace_url(&mut url, Some(Some(String::new())));
        assert_eq!(url, None);

        url = Some("https://a".to_string());
        replace_url(&mut url, Some(None));
        assert_eq!(url, None);

        replace_url(&mut url, Some(Some("https://b".into())));
        assert_eq!(url.as_deref(), Some("https://b"));
    }
}
