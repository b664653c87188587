// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![cfg_attr(not(test), deny(clippy::panic_in_result_fn))]
#![cfg_attr(not(debug_assertions), deny(clippy::used_underscore_binding))]

use std::{
    env::current_exe,
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use tokio::sync::mpsc;

use crate::{
    config::Config,
    runtime::{Command as RuntimeCommand, State as RuntimeState},
};

mod config;
mod env;
mod items;
mod routing;
mod runtime;

#[must_use]
fn app_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

#[must_use]
fn app_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "filtersync", app_name())
}

#[must_use]
fn app_config_dir(app_dirs: &ProjectDirs) -> &Path {
    app_dirs.config_dir()
}

#[must_use]
fn new_config_file_path(app_dirs: &ProjectDirs, file_suffix: &str) -> PathBuf {
    let mut path_buf = app_config_dir(app_dirs).to_path_buf();
    path_buf.push("config");
    path_buf.set_extension(file_suffix);
    path_buf
}

#[must_use]
fn load_app_config(app_dirs: &ProjectDirs) -> Config {
    let file_path = new_config_file_path(app_dirs, "ron");
    log::info!("Loading configuration from file: {}", file_path.display());
    match fs::read(&file_path) {
        Ok(bytes) => ron::de::from_bytes(&bytes)
            .map_err(|err| {
                log::warn!("Failed to parse configuration data: {err}");
            })
            .unwrap_or_default(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Default::default(),
        Err(err) => {
            log::warn!("Failed to read configuration data from file: {err}");
            Default::default()
        }
    }
}

fn main() {
    env::init_environment();

    if let Err(err) = env::init_tracing_and_logging() {
        eprintln!("Failed to initialize tracing and logging: {err}");
        return;
    }

    if let Ok(exe_path) = current_exe() {
        log::info!("Executable: {}", exe_path.display());
    }
    log::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let initial_config: Config = if env::parse_default_config().unwrap_or(false) {
        log::info!("Using initial default configuration");
        Default::default()
    } else {
        app_dirs().as_ref().map(load_app_config).unwrap_or_default()
    };
    log::debug!("Initial configuration: {initial_config:?}");

    // Override config with environment variables
    log::info!("Patching configuration from .env file and environment variables");
    let mut config = initial_config.clone();
    env::parse_config_into(&mut config);
    if config != initial_config {
        log::debug!("Patched configuration: {config:?}");
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to create runtime: {err}");
            return;
        }
    };

    if let Err(err) = runtime.block_on(run_headless(config)) {
        log::error!("Runtime terminated with error: {err:#}");
    }

    log::info!("Exiting");
}

async fn run_headless(config: Config) -> anyhow::Result<()> {
    log::info!("Running headless");

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to register signal handler: {err}");
            return;
        }
        log::info!("Received interrupt signal");
        if command_tx.send(RuntimeCommand::Terminate).is_err() {
            log::warn!("Failed to forward termination request");
        }
    });

    let state_pub = discro::Publisher::new(None);
    let mut state_sub = state_pub.subscribe();
    tokio::spawn(async move {
        loop {
            let state = *state_sub.read_ack();
            if let Some(RuntimeState::Listening { socket_addr }) = state {
                // Publish socket address on stdout
                println!("{socket_addr}");
            }
            if state_sub.changed().await.is_err() {
                break;
            }
        }
    });

    runtime::run(config, command_rx, state_pub).await
}
