//! Reply Builder module for formatting outbound message text

// Import localization
use crate::localization::t_lang;

// Import news types
use crate::news::NewsArticle;

/// Format one news article as a chat reply
///
/// Missing fields render as empty strings; the article is not validated.
pub fn format_news_article(article: &NewsArticle, language: &str) -> String {
    format!(
        "{}\n\n{}: {}\n\n{}: {}\n\n{}: {}",
        t_lang("news-heading", language),
        t_lang("news-title-label", language),
        article.title.as_deref().unwrap_or_default(),
        t_lang("news-description-label", language),
        article.description.as_deref().unwrap_or_default(),
        t_lang("news-url-label", language),
        article.url.as_deref().unwrap_or_default(),
    )
}
