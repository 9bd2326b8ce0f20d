pub mod keys;
pub mod model;
pub mod service;
pub mod validate;

pub use model::{Article, ArticlePatch, Comment, NewArticle, NewComment};
pub use service::ContentService;
