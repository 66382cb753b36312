//! Callback Handler module for processing category button callback queries

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{debug, error};

use crate::catalog::{CatalogAction, Category};
use crate::db;

use super::{deliver, BotDeps};

const FETCH_FAILED_TEXT: &str =
    "Sorry, I couldn't fetch files right now. Please try again later.";

/// Handle callback queries from the category keyboard.
pub async fn callback_handler(bot: Bot, q: CallbackQuery, deps: BotDeps) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query");

    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    // Callback data is a raw category slug; anything else is stale markup.
    let Some(category) = Category::from_slug(data) else {
        debug!(user_id = %q.from.id, data = %data, "Ignoring unknown callback data");
        return Ok(());
    };
    let Some(msg) = &q.message else {
        return Ok(());
    };
    let chat_id = msg.chat().id;

    match deps.catalog.handle_category(category.slug()).await {
        Ok(actions) => {
            let documents_sent = actions
                .iter()
                .filter(|action| matches!(action, CatalogAction::SendDocument { .. }))
                .count() as i64;

            for action in actions {
                deliver(&bot, chat_id, action).await?;
            }

            db::record_downloads(&deps.pool, q.from.id.0 as i64, documents_sent).await;
        }
        Err(e) => {
            error!(
                user_id = %q.from.id,
                category = %category.slug(),
                error = %e,
                "Failed to fetch category files"
            );
            bot.send_message(chat_id, FETCH_FAILED_TEXT).await?;
        }
    }

    Ok(())
}
