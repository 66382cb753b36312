//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ChatKind;
use tracing::{debug, error, info};

use crate::catalog::Upload;
use crate::db;
use crate::replies;

use super::ui_builder::category_keyboard;
use super::{deliver, BotDeps};

const WELCOME_TEXT: &str = "👋 Welcome! Send me a document and I'll keep it on the shelf.\n\
    Use /categories to browse stored files, or mention me in any chat to search them inline.";

const UPLOAD_FAILED_TEXT: &str =
    "Sorry, I couldn't save your file right now. Please try again later.";

const UNSUPPORTED_TEXT: &str = "I can only store files sent as documents.\n\
    Attach the file as a document, or use /categories to browse what's already stored.";

fn help_text(bot_username: &str) -> String {
    format!(
        "📖 How to use this bot:\n\n\
         1. Send any file as a document to store it.\n\
         2. Use /categories and pick a category to get files back.\n\
         3. Type @{bot_username} followed by keywords in any chat to search stored files by name.\n\
         4. Use /stats to see your usage numbers."
    )
}

/// First token of a command message, with any `@botname` suffix removed.
fn command_token<'a>(text: &'a str, bot_username: &str) -> Option<&'a str> {
    let token = text.split_whitespace().next()?;
    if !token.starts_with('/') {
        return None;
    }

    match token.strip_suffix(&format!("@{bot_username}")) {
        Some(stripped) => Some(stripped),
        None => Some(token),
    }
}

async fn handle_text_message(bot: &Bot, msg: &Message, deps: &BotDeps) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message");

    match command_token(text, &deps.bot_username) {
        Some("/start") => {
            bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
        }
        Some("/help") => {
            bot.send_message(msg.chat.id, help_text(&deps.bot_username))
                .await?;
        }
        Some("/categories") => {
            bot.send_message(msg.chat.id, "Select a category:")
                .reply_markup(category_keyboard())
                .await?;
        }
        Some("/stats") => {
            handle_stats_command(bot, msg, deps).await?;
        }
        Some(other) => {
            debug!(user_id = %msg.chat.id, command = %other, "Ignoring unknown command");
        }
        None => {
            handle_chatter(bot, msg, text, deps).await?;
        }
    }

    Ok(())
}

async fn handle_stats_command(bot: &Bot, msg: &Message, deps: &BotDeps) -> Result<()> {
    let Some(user) = &msg.from else {
        return Ok(());
    };

    match db::get_user_stats(&deps.pool, user.id.0 as i64).await {
        Ok(Some(stats)) => {
            let body = format!(
                "📊 Your stats:\n\
                 Interactions: {}\n\
                 Uploads: {}\n\
                 Downloads: {}\n\
                 First seen: {}",
                stats.interactions,
                stats.uploads,
                stats.downloads,
                stats.first_seen.format("%Y-%m-%d")
            );
            bot.send_message(msg.chat.id, body).await?;
        }
        Ok(None) => {
            bot.send_message(msg.chat.id, "No stats recorded for you yet.")
                .await?;
        }
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Failed to read user stats");
            bot.send_message(msg.chat.id, "Sorry, stats are unavailable right now.")
                .await?;
        }
    }

    Ok(())
}

/// Free-text replies. In group chats the bot only answers when mentioned,
/// and the mention is stripped before keyword matching.
async fn handle_chatter(bot: &Bot, msg: &Message, text: &str, deps: &BotDeps) -> Result<()> {
    let reply = if matches!(msg.chat.kind, ChatKind::Private(_)) {
        replies::reply_to(text)
    } else {
        let mention = format!("@{}", deps.bot_username);
        if !text.contains(&mention) {
            return Ok(());
        }
        let stripped = text.replace(&mention, "");
        replies::reply_to(stripped.trim())
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_document_message(bot: &Bot, msg: &Message, deps: &BotDeps) -> Result<()> {
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let upload = Upload {
        file_id: doc.file.id.0.clone(),
        name: doc.file_name.clone(),
    };

    info!(user_id = %msg.chat.id, name = ?upload.name, "Received document upload");

    match deps.catalog.handle_upload(&upload).await {
        Ok(confirmation) => {
            deliver(bot, msg.chat.id, confirmation).await?;
            if let Some(user) = &msg.from {
                db::record_upload(&deps.pool, user.id.0 as i64).await;
            }
        }
        Err(e) => {
            error!(user_id = %msg.chat.id, error = %e, "Failed to save uploaded document");
            bot.send_message(msg.chat.id, UPLOAD_FAILED_TEXT).await?;
        }
    }

    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type");

    bot.send_message(msg.chat.id, UNSUPPORTED_TEXT).await?;
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, deps: BotDeps) -> Result<()> {
    // Stats are best-effort; recording failures are logged in db and never
    // block the reply path.
    if let Some(user) = &msg.from {
        db::record_interaction(
            &deps.pool,
            user.id.0 as i64,
            user.username.as_deref(),
            &user.first_name,
        )
        .await;
    }

    if msg.text().is_some() {
        handle_text_message(&bot, &msg, &deps).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg, &deps).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_token_strips_own_bot_suffix() {
        assert_eq!(
            command_token("/start@fileshelf_bot", "fileshelf_bot"),
            Some("/start")
        );
    }

    #[test]
    fn command_token_keeps_plain_commands() {
        assert_eq!(
            command_token("/categories", "fileshelf_bot"),
            Some("/categories")
        );
        assert_eq!(command_token("/start now", "fileshelf_bot"), Some("/start"));
    }

    #[test]
    fn command_token_rejects_plain_text() {
        assert_eq!(command_token("hello", "fileshelf_bot"), None);
        assert_eq!(command_token("", "fileshelf_bot"), None);
    }

    #[test]
    fn command_token_leaves_foreign_suffix_alone() {
        assert_eq!(
            command_token("/start@other_bot", "fileshelf_bot"),
            Some("/start@other_bot")
        );
    }
}
