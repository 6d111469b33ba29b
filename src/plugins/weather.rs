//! Weather inline query plugin.
//!
//! `@bot <city>` answers with two articles (short and detailed report).
//! An empty query gets a usage hint and any failure a single error article.

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{
    InlineQueryResult, InlineQueryResultArticle, InputMessageContent, InputMessageContentText,
    ParseMode,
};
use tracing::{debug, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::i18n::{get_text, get_text_with};
use crate::weather::{WeatherError, WeatherReport, build_report};

/// Handle inline queries.
pub async fn inline_query_handler(
    bot: ThrottledBot,
    q: InlineQuery,
    state: AppState,
) -> anyhow::Result<()> {
    let locale = state.users.lang_of(q.from.id.0 as i64).await;
    let query = q.query.trim();

    let results = if query.is_empty() {
        vec![hint_article(&state, &locale)]
    } else {
        match lookup(&state, query, &locale).await {
            Ok(report) => report_articles(&report, &locale),
            Err(e) => {
                warn!("Weather lookup for {:?} failed: {}", query, e);
                vec![error_article(&locale)]
            }
        }
    };

    bot.answer_inline_query(q.id.clone(), results)
        .cache_time(0)
        .await?;

    Ok(())
}

async fn lookup(state: &AppState, query: &str, locale: &str) -> Result<WeatherReport, WeatherError> {
    let weather = state.weather.current(query, locale).await?;
    debug!("Weather for {:?} resolved to {:?}", query, weather.name);
    build_report(query, &weather, locale, Utc::now())
}

fn report_articles(report: &WeatherReport, locale: &str) -> Vec<InlineQueryResult> {
    let description = get_text_with(
        locale,
        "weather.article_description",
        &[("city", &report.city), ("country", &report.country)],
    );

    vec![
        article(
            "compact",
            get_text(locale, "weather.compact_title"),
            description.clone(),
            report.compact.clone(),
        ),
        article(
            "detailed",
            get_text(locale, "weather.detailed_title"),
            description,
            report.detailed.clone(),
        ),
    ]
}

fn hint_article(state: &AppState, locale: &str) -> InlineQueryResult {
    article(
        "hint",
        get_text(locale, "weather.hint.title"),
        get_text(locale, "weather.hint.description"),
        get_text_with(locale, "weather.hint.text", &[("bot", &state.bot_username)]),
    )
}

fn error_article(locale: &str) -> InlineQueryResult {
    article(
        "error",
        get_text(locale, "weather.error.title"),
        get_text(locale, "weather.error.description"),
        get_text(locale, "weather.error.text"),
    )
}

fn article(id: &str, title: String, description: String, html: String) -> InlineQueryResult {
    let content = InputMessageContent::Text(
        InputMessageContentText::new(html).parse_mode(ParseMode::Html),
    );
    InlineQueryResult::Article(
        InlineQueryResultArticle::new(id, title, content).description(description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_article_is_html_article() {
        let InlineQueryResult::Article(article) = error_article("en") else {
            panic!("expected an article");
        };
        assert_eq!(article.id, "error");
        assert_eq!(article.title, get_text("en", "weather.error.title"));
        let InputMessageContent::Text(text) = article.input_message_content else {
            panic!("expected text content");
        };
        assert_eq!(text.parse_mode, Some(ParseMode::Html));
    }
}
