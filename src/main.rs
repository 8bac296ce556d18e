// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

mod app;
mod config;
mod logic;
mod models;
mod mvu;
mod services;
mod ui;
mod utils;

use anyhow::Context;

use crate::config::Config;
use crate::mvu::AppModel;
use crate::services::Services;
use crate::services::storage::{KEY_SELECTED_CATEGORY, KEY_TOKEN};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = Config::from_env()?;
    log::info!(
        "Starting Folio against {} (store: {})",
        config.api_base,
        config.store_path().display()
    );

    let services = Services::from_config(&config)?;
    let model = {
        let store = services.store();
        AppModel::restored(
            store.get(KEY_TOKEN).map(str::to_string),
            store.get(KEY_SELECTED_CATEGORY).map(str::to_string),
        )
    };
    if model.edit_mode() {
        log::info!("Restored session token, starting in edit mode");
    }

    app::run(services, model)
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("UI event loop failed")
}
