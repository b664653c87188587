// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use bytes::Bytes;
use reqwest::{Client, Response};
use url::Url;

use filtersync_core::filter::{Field, FilterSet};

use super::{FetchBackend, FetchResponse};

/// Fetches items from the web API.
#[derive(Debug, Clone)]
pub struct WebApiBackend {
    client: Client,
    api_url: Url,
}

impl WebApiBackend {
    /// The `api_url` must end with a slash.
    #[must_use]
    pub const fn new(client: Client, api_url: Url) -> Self {
        Self { client, api_url }
    }

    fn join_api_url(&self, query_suffix: &str) -> anyhow::Result<Url> {
        self.api_url.join(query_suffix).map_err(Into::into)
    }
}

async fn receive_response_body(response: Response) -> anyhow::Result<Bytes> {
    let response_status = response.status();
    let bytes = response.bytes().await?;
    if !response_status.is_success() {
        let err = anyhow::anyhow!("{response_status}");
        let json = serde_json::from_slice::<serde_json::Value>(&bytes).unwrap_or_default();
        let err = if json.is_null() {
            err
        } else {
            err.context(json)
        };
        return Err(err);
    }
    Ok(bytes)
}

/// All fields except the presentation-only ones, including defaults.
fn query_params(filters: &FilterSet) -> Vec<(&'static str, String)> {
    Field::iter_all()
        .filter(|field| !field.is_ui_only())
        .map(|field| (field.name(), filters.value(field).to_param_value()))
        .collect()
}

impl FetchBackend for WebApiBackend {
    fn fetch(
        &self,
        filters: FilterSet,
    ) -> impl Future<Output = anyhow::Result<FetchResponse>> + Send {
        async move {
            let query_params_urlencoded = serde_urlencoded::to_string(query_params(&filters))?;
            let request_url = self.join_api_url(&format!("creatives?{query_params_urlencoded}"))?;
            let response = self.client.get(request_url).send().await?;
            let response_body = receive_response_body(response).await?;
            let response =
                serde_json::from_slice::<filtersync_core_json::response::ResponseEnvelope>(
                    &response_body,
                )?;
            log::debug!(
                "Received {num_items} item(s) for {fingerprint}",
                num_items = response.items.len(),
                fingerprint = response.fingerprint,
            );
            response.try_into()
        }
    }
}
