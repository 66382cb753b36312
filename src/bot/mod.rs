//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: commands, document uploads, and free-text replies
//! - `callback_handler`: category button callback queries
//! - `inline_handler`: inline search queries
//! - `ui_builder`: keyboards and static button sets

pub mod callback_handler;
pub mod inline_handler;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPool;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, FileId, InputFile};

use crate::catalog::{Catalog, CatalogAction};

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use inline_handler::inline_query_handler;
pub use message_handler::message_handler;

/// Dependencies shared by every update handler.
#[derive(Clone)]
pub struct BotDeps {
    pub catalog: Arc<Catalog>,
    pub pool: PgPool,
    pub bot_username: String,
}

/// Register the command list shown in the Telegram client UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(vec![
        BotCommand::new("start", "what this bot does"),
        BotCommand::new("help", "how to store and find files"),
        BotCommand::new("categories", "browse stored files by category"),
        BotCommand::new("stats", "your usage statistics"),
    ])
    .await?;

    Ok(())
}

/// Deliver one catalog action to a chat.
pub(crate) async fn deliver(bot: &Bot, chat_id: ChatId, action: CatalogAction) -> Result<()> {
    match action {
        CatalogAction::SendText { body } => {
            bot.send_message(chat_id, body).await?;
        }
        CatalogAction::SendDocument { file_id, caption } => {
            bot.send_document(chat_id, InputFile::file_id(FileId(file_id)))
                .caption(caption)
                .await?;
        }
    }

    Ok(())
}
