/// Key-space layout for content records.
///
/// Two families share the store namespace:
/// - Article: `article:{articleId}`
/// - Comment: `comment:{articleId}:{commentId}`
///
/// Prefixing comment keys with the owning article id turns "comments of X"
/// into the prefix scan `comment:{X}:` and "all comments" into `comment:`.

pub const ARTICLE_PREFIX: &str = "article:";
pub const COMMENT_PREFIX: &str = "comment:";
const SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKey {
    Article(String),
    Comment {
        article_id: String,
        comment_id: String,
    },
}

impl ContentKey {
    /// Parse a raw store key. Returns `None` for keys outside the content families.
    pub fn parse(key: &str) -> Option<Self> {
        if let Some(id) = key.strip_prefix(ARTICLE_PREFIX) {
            is_valid_id(id).then(|| ContentKey::Article(id.to_string()))
        } else if let Some(rest) = key.strip_prefix(COMMENT_PREFIX) {
            let (article_id, comment_id) = rest.split_once(SEPARATOR)?;
            (is_valid_id(article_id) && is_valid_id(comment_id)).then(|| ContentKey::Comment {
                article_id: article_id.to_string(),
                comment_id: comment_id.to_string(),
            })
        } else {
            None
        }
    }

    /// Id of the article this key belongs to.
    pub fn article_id(&self) -> &str {
        match self {
            ContentKey::Article(id) => id,
            ContentKey::Comment { article_id, .. } => article_id,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, ContentKey::Comment { .. })
    }
}

pub fn article_key(article_id: &str) -> String {
    format!("{ARTICLE_PREFIX}{article_id}")
}

pub fn comment_key(article_id: &str, comment_id: &str) -> String {
    format!("{COMMENT_PREFIX}{article_id}{SEPARATOR}{comment_id}")
}

/// Prefix selecting every comment of one article.
pub fn comments_prefix(article_id: &str) -> String {
    format!("{COMMENT_PREFIX}{article_id}{SEPARATOR}")
}

/// An id may not be empty or contain the separator; either would let one
/// article's comment prefix match another article's keys.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(SEPARATOR)
}
