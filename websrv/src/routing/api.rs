// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use jiff::Zoned;
use warp::{Filter, Reply, filters::BoxedFilter};

#[cfg(feature = "json-schema")]
use schemars::schema_for;

use filtersync_backend_webapi_json::{self as api, cache::ResponseCache, creatives::query::Context};
use filtersync_core::{registry::RegistrySnapshot, validate::RawInput};
use filtersync_websrv_warp as websrv;

use crate::items::JsonItemSource;

/// Shared, read-only collaborators of all request handlers.
#[derive(Debug)]
pub(crate) struct Backend {
    pub(crate) registry: RegistrySnapshot,
    pub(crate) source: JsonItemSource,
    pub(crate) cache: ResponseCache,
}

impl Backend {
    fn query(&self, input: &RawInput) -> api::Result<api::creatives::query::ResponseBody> {
        let context = Context {
            registry: &self.registry,
            source: &self.source,
            cache: Some(&self.cache),
            today: Zoned::now().date(),
        };
        api::creatives::query::handle_request(&context, input)
    }

    fn validate(&self, input: &RawInput) -> api::Result<api::creatives::validate::ResponseBody> {
        api::creatives::validate::handle_request(&self.registry, Zoned::now().date(), input)
    }
}

/// The raw query string, empty if missing.
fn raw_query() -> impl Filter<Extract = (String,), Error = std::convert::Infallible> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
}

pub(crate) fn create_filters(shared_backend: Arc<Backend>) -> BoxedFilter<(impl Reply,)> {
    let shared_backend = warp::any().map(move || Arc::clone(&shared_backend));

    log::info!("Creating API routes");

    let creatives_path = warp::path("creatives");
    let validate_path = warp::path("validate");

    let creatives_query_get = warp::get()
        .and(creatives_path)
        .and(warp::path::end())
        .and(raw_query())
        .and(shared_backend.clone())
        .and_then(|query: String, shared_backend: Arc<Backend>| async move {
            websrv::spawn_blocking_task(move || {
                let input = api::creatives::request_input_from_query(&query);
                shared_backend.query(&input)
            })
            .await
            .map(|response_body| warp::reply::json(&response_body))
        });
    let creatives_query_post = warp::post()
        .and(creatives_path)
        .and(warp::path::end())
        .and(warp::body::json())
        .and(shared_backend.clone())
        .and_then(
            |request_body: serde_json::Value, shared_backend: Arc<Backend>| async move {
                websrv::spawn_blocking_task(move || {
                    let input = api::creatives::request_input_from_json(request_body)?;
                    shared_backend.query(&input)
                })
                .await
                .map(|response_body| warp::reply::json(&response_body))
            },
        );
    let creatives_validate_get = warp::get()
        .and(creatives_path)
        .and(validate_path)
        .and(warp::path::end())
        .and(raw_query())
        .and(shared_backend.clone())
        .and_then(|query: String, shared_backend: Arc<Backend>| async move {
            websrv::spawn_blocking_task(move || {
                let input = api::creatives::request_input_from_query(&query);
                shared_backend.validate(&input)
            })
            .await
            .map(|response_body| warp::reply::json(&response_body))
        });
    let creatives_validate_post = warp::post()
        .and(creatives_path)
        .and(validate_path)
        .and(warp::path::end())
        .and(warp::body::json())
        .and(shared_backend)
        .and_then(
            |request_body: serde_json::Value, shared_backend: Arc<Backend>| async move {
                websrv::spawn_blocking_task(move || {
                    let input = api::creatives::request_input_from_json(request_body)?;
                    shared_backend.validate(&input)
                })
                .await
                .map(|response_body| warp::reply::json(&response_body))
            },
        );

    #[cfg(feature = "json-schema")]
    let creatives_schema = warp::get()
        .and(warp::path("schema"))
        .and(creatives_path)
        .and(warp::path::end())
        .map(|| {
            let query_schema = schema_for!(api::creatives::query::ResponseBody);
            let validate_schema = schema_for!(api::creatives::validate::ResponseBody);
            let schema = serde_json::json!({
                "query": query_schema,
                "validate": validate_schema,
            });
            warp::reply::json(&schema)
        });

    let filters = creatives_validate_get
        .or(creatives_validate_post)
        .or(creatives_query_get)
        .or(creatives_query_post);

    #[cfg(feature = "json-schema")]
    let filters = filters.or(creatives_schema);

    filters.boxed()
}
