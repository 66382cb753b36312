//! Process configuration loaded from the environment.

use anyhow::{Context, Result};
use std::env;

/// Runtime configuration, read once at startup and passed in explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            bot_token,
            database_url,
        })
    }
}
