// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{net::SocketAddr, sync::Arc, time::Duration};

use jiff::Timestamp;
use tokio::{sync::mpsc, time::sleep};
use warp::{Filter, http::StatusCode};

use filtersync_backend_webapi_json::cache::ResponseCache;
use filtersync_websrv_warp::handle_rejection;

use crate::{
    config::Config,
    items::JsonItemSource,
    routing::{self, api::Backend},
};

const WEB_SERVER_LISTENING_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub(crate) enum State {
    Launching,
    Starting,
    Listening { socket_addr: SocketAddr },
    Stopping,
    Terminating,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Command {
    Terminate,
}

fn provision_backend(config: &Config) -> anyhow::Result<Backend> {
    let source = if let Some(items_file) = &config.items_file {
        log::info!("Loading items from file: {}", items_file.display());
        JsonItemSource::load_file(items_file)?
    } else {
        log::warn!("No items file configured");
        JsonItemSource::default()
    };
    log::info!("Serving {num_items} item(s)", num_items = source.len());

    if config.registry.is_empty() {
        log::warn!("Empty registry: all entity codes will be rejected");
    }

    let ttl = config.cache.ttl();
    let capacity = config.cache.capacity;
    log::info!(
        "Caching up to {capacity} response(s) for {ttl_secs} s",
        ttl_secs = ttl.as_secs()
    );

    Ok(Backend {
        registry: config.registry.clone(),
        source,
        cache: ResponseCache::new(ttl, capacity),
    })
}

pub(crate) async fn run(
    config: Config,
    command_rx: mpsc::UnboundedReceiver<Command>,
    current_state_tx: discro::Publisher<Option<State>>,
) -> anyhow::Result<()> {
    let launched_at = Timestamp::now();

    log::info!("Launching");
    current_state_tx.write(Some(State::Launching));

    let shared_backend = Arc::new(provision_backend(&config)?);

    let about_json = serde_json::json!({
    "name": env!("CARGO_PKG_NAME"),
    "description": env!("CARGO_PKG_DESCRIPTION"),
    "version": env!("CARGO_PKG_VERSION"),
    "instance": {
        "launched_at": launched_at.to_string(),
        "config": config,
    }
    });

    log::info!("Creating service routes");

    // POST /shutdown
    let (server_shutdown_tx, mut server_shutdown_rx) = mpsc::unbounded_channel::<()>();
    let shutdown_filter = warp::post()
        .and(warp::path("shutdown"))
        .and(warp::path::end())
        .map(move || {
            server_shutdown_tx
                .send(())
                .map(|()| StatusCode::ACCEPTED)
                .map_err(|_| {
                    log::warn!("Failed to forward shutdown request");
                    StatusCode::BAD_GATEWAY
                })
        });

    // GET /about
    let about_filter = warp::get()
        .and(warp::path("about"))
        .and(warp::path::end())
        .map(move || warp::reply::json(&about_json));

    let api_filters = warp::path("api").and(routing::api::create_filters(shared_backend));

    let all_filters = api_filters.or(shutdown_filter).or(about_filter);

    log::info!("Initializing server");

    let server = warp::serve(
        all_filters
            .with(warp::cors().allow_any_origin())
            .recover(handle_rejection),
    );

    log::info!("Starting");
    current_state_tx.write(Some(State::Starting));

    let (socket_addr, server_listener) = {
        let mut command_rx = command_rx;
        server.bind_with_graceful_shutdown(config.network.endpoint.socket_addr(), async move {
            tokio::select! {
                Some(()) = server_shutdown_rx.recv() => (),
                Some(Command::Terminate) = command_rx.recv() => (),
                else => (),
            }
        })
    };

    // Give the server some time to become ready and start listening
    // before announcing the actual endpoint address, i.e. when using
    // an ephemeral port.
    sleep(WEB_SERVER_LISTENING_DELAY).await;

    log::info!("Listening on {socket_addr}");
    current_state_tx.write(Some(State::Listening { socket_addr }));

    server_listener.await;

    log::info!("Stopping");
    current_state_tx.write(Some(State::Stopping));

    log::info!("Terminating");
    current_state_tx.write(Some(State::Terminating));

    Ok(())
}
