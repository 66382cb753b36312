use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPool;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineQuery};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fileshelf::bot::{self, BotDeps};
use fileshelf::catalog::{Catalog, FixedClassifier};
use fileshelf::config::Config;
use fileshelf::db::{self, PgFileStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting FileShelf Telegram Bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    info!("Connecting to database");
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    db::init_database_schema(&pool).await?;

    // Initialize the bot
    let bot = Bot::new(&config.bot_token);

    let me = bot.get_me().await.context("Failed to fetch bot identity")?;
    bot::setup_bot_commands(&bot)
        .await
        .context("Failed to register bot commands")?;

    let catalog = Arc::new(Catalog::new(
        Arc::new(PgFileStore::new(pool.clone())),
        Arc::new(FixedClassifier),
    ));
    let deps = BotDeps {
        catalog,
        pool: pool.clone(),
        bot_username: me.username().to_string(),
    };

    info!(bot_username = %deps.bot_username, "Bot initialized, starting dispatcher");

    // Set up the dispatcher with one branch per inbound event shape
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let deps = deps.clone();
            move |bot: Bot, msg: Message| {
                let deps = deps.clone();
                async move { bot::message_handler(bot, msg, deps).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let deps = deps.clone();
            move |bot: Bot, q: CallbackQuery| {
                let deps = deps.clone();
                async move { bot::callback_handler(bot, q, deps).await }
            }
        }))
        .branch(Update::filter_inline_query().endpoint({
            let deps = deps.clone();
            move |bot: Bot, q: InlineQuery| {
                let deps = deps.clone();
                async move { bot::inline_query_handler(bot, q, deps).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped, releasing database connections");
    pool.close().await;

    Ok(())
}
