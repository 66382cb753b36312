//! Inline Handler module for answering inline search queries

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{
    InlineQuery, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
    InputMessageContentText,
};
use tracing::{debug, error};

use super::BotDeps;

/// Handle inline search queries against stored file names.
///
/// Empty queries are never answered, matching the catalog's own early exit.
/// A storage failure is answered with an empty result list since inline
/// queries carry no chat to send a notice to.
pub async fn inline_query_handler(bot: Bot, q: InlineQuery, deps: BotDeps) -> Result<()> {
    if q.query.is_empty() {
        debug!(user_id = %q.from.id, "Ignoring empty inline query");
        return Ok(());
    }

    let results = match deps.catalog.handle_inline_query(&q.query).await {
        Ok(results) => results,
        Err(e) => {
            error!(user_id = %q.from.id, query = %q.query, error = %e, "Inline search failed");
            Vec::new()
        }
    };

    let articles = results
        .into_iter()
        .map(|result| {
            InlineQueryResult::Article(InlineQueryResultArticle::new(
                result.id,
                result.title,
                InputMessageContent::Text(InputMessageContentText::new(result.body)),
            ))
        })
        .collect::<Vec<_>>();

    bot.answer_inline_query(q.id, articles).await?;

    Ok(())
}
