// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    env, fs,
    net::IpAddr,
    path::PathBuf,
    str::ParseBoolError,
};

use anyhow::Error;
use tracing::subscriber::set_global_default;
use tracing_log::LogTracer;
use tracing_subscriber::EnvFilter;

use filtersync_core::registry::RegistrySnapshot;

use crate::config::Config;

pub(crate) fn init_environment() {
    if let Ok(path) = dotenvy::dotenv() {
        // Print to stderr because logging has not been initialized yet
        eprintln!("Loaded environment from dotenv file {}", path.display());
    }
}

const TRACING_SUBSCRIBER_ENV_FILTER_DEFAULT: &str = "info";

fn create_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|err| {
        if let Ok(rust_log_from_env) = env::var("RUST_LOG") {
            if !rust_log_from_env.is_empty() {
                eprintln!("Failed to parse RUST_LOG environment variable '{rust_log_from_env}': {err}");
            }
        }
        EnvFilter::new(TRACING_SUBSCRIBER_ENV_FILTER_DEFAULT)
    })
}

pub(crate) fn init_tracing_and_logging() -> anyhow::Result<()> {
    // Capture and redirect all log messages as tracing events
    LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(create_env_filter())
        .with_writer(std::io::stderr)
        .finish();
    set_global_default(subscriber)?;

    Ok(())
}

fn parse_bool_var(var: &str) -> Result<bool, ParseBoolError> {
    var.to_lowercase().parse::<bool>().or_else(|err| {
        if let Ok(val) = var.parse::<u8>() {
            match val {
                0 => return Ok(false),
                1 => return Ok(true),
                _ => (),
            }
        }
        Err(err)
    })
}

const DEFAULT_CONFIG_ENV: &str = "DEFAULT_CONFIG";

pub(crate) fn parse_default_config() -> Option<bool> {
    env::var(DEFAULT_CONFIG_ENV)
        .map_err(Error::from)
        .and_then(|var| {
            log::debug!("{DEFAULT_CONFIG_ENV} = {var}");
            parse_bool_var(&var).map_err(|err| {
                log::warn!("Failed to parse {DEFAULT_CONFIG_ENV} = {var}: {err}");
                Error::from(err)
            })
        })
        .ok()
}

const ENDPOINT_IP_ENV: &str = "ENDPOINT_IP";

fn parse_endpoint_ip() -> Option<IpAddr> {
    env::var(ENDPOINT_IP_ENV)
        .map_err(Error::from)
        .and_then(|var| {
            log::debug!("{ENDPOINT_IP_ENV} = {var}");
            var.parse().map_err(|err| {
                log::warn!("Failed to parse {ENDPOINT_IP_ENV} = {var}: {err}");
                Error::from(err)
            })
        })
        .ok()
}

const ENDPOINT_PORT_ENV: &str = "ENDPOINT_PORT";

fn parse_endpoint_port() -> Option<u16> {
    env::var(ENDPOINT_PORT_ENV)
        .map_err(Error::from)
        .and_then(|var| {
            log::debug!("{ENDPOINT_PORT_ENV} = {var}");
            var.trim().parse().map_err(|err| {
                log::warn!("Failed to parse {ENDPOINT_PORT_ENV} = {var}: {err}");
                Error::from(err)
            })
        })
        .ok()
}

const CACHE_TTL_SECS_ENV: &str = "CACHE_TTL_SECS";

fn parse_cache_ttl_secs() -> Option<u64> {
    env::var(CACHE_TTL_SECS_ENV)
        .map_err(Error::from)
        .and_then(|var| {
            log::debug!("{CACHE_TTL_SECS_ENV} = {var}");
            var.trim().parse().map_err(|err| {
                log::warn!("Failed to parse {CACHE_TTL_SECS_ENV} = {var}: {err}");
                Error::from(err)
            })
        })
        .ok()
}

const ITEMS_FILE_ENV: &str = "ITEMS_FILE";

fn parse_items_file() -> Option<PathBuf> {
    let var = env::var(ITEMS_FILE_ENV).ok()?;
    log::debug!("{ITEMS_FILE_ENV} = {var}");
    let var = var.trim();
    (!var.is_empty()).then(|| PathBuf::from(var))
}

const REGISTRY_FILE_ENV: &str = "REGISTRY_FILE";

/// Load the active entity codes from a JSON file.
fn parse_registry_file() -> Option<RegistrySnapshot> {
    let var = env::var(REGISTRY_FILE_ENV).ok()?;
    log::debug!("{REGISTRY_FILE_ENV} = {var}");
    let bytes = fs::read(var.trim())
        .map_err(|err| {
            log::warn!("Failed to read registry from file {var}: {err}");
        })
        .ok()?;
    serde_json::from_slice(&bytes)
        .map_err(|err| {
            log::warn!("Failed to parse registry from file {var}: {err}");
        })
        .ok()
}

pub(crate) fn parse_config_into(config: &mut Config) {
    let endpoint = &mut config.network.endpoint;
    if let Some(ip_addr) = parse_endpoint_ip() {
        endpoint.ip_addr = ip_addr;
    }
    if let Some(port) = parse_endpoint_port() {
        endpoint.port = port;
    }
    if let Some(ttl_secs) = parse_cache_ttl_secs() {
        config.cache.ttl_secs = ttl_secs;
    }
    if let Some(items_file) = parse_items_file() {
        config.items_file = Some(items_file);
    }
    if let Some(registry) = parse_registry_file() {
        config.registry = registry;
    }
}
