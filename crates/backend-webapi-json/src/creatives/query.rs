// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::{Timestamp, civil::Date};

use filtersync_core::{
    pagination::paginate,
    registry::EntityRegistry,
    response::ResponseEnvelope,
    validate::{RawInput, Validator},
};

use crate::{cache::ResponseCache, source::ItemSource};

use super::*;

pub type ResponseBody = filtersync_core_json::response::ResponseEnvelope;

/// Collaborators of the query endpoint.
#[allow(missing_debug_implementations)]
pub struct Context<'a, R: ?Sized, S: ?Sized> {
    pub registry: &'a R,
    pub source: &'a S,
    pub cache: Option<&'a ResponseCache>,

    /// The current date for checking custom date ranges.
    pub today: Date,
}

#[allow(clippy::panic_in_result_fn)] // tracing::instrument
#[tracing::instrument(
    name = "Querying creatives",
    skip_all,
    fields(
        request_id = %new_request_id(),
    )
)]
pub fn handle_request<R, S>(context: &Context<'_, R, S>, input: &RawInput) -> Result<ResponseBody>
where
    R: EntityRegistry + ?Sized,
    S: ItemSource + ?Sized,
{
    let Context {
        registry,
        source,
        cache,
        today,
    } = context;
    let validator = Validator::new(*registry, *today);
    let mut filters = validator
        .validate_strict(input)
        .map_err(Error::Validation)?;
    let fingerprint = filters.fingerprint();
    if let Some(response) = cache.and_then(|cache| cache.get(&fingerprint)) {
        log::debug!("Responding with cached result {fingerprint}");
        return Ok(response);
    }
    let total = source.count(&filters)?;
    let pagination = paginate(total, filters.per_page.into(), filters.page.into());
    // The requested page might be beyond the last page
    filters.page = pagination.current_page() as u32;
    let items = if pagination.is_empty() {
        Vec::new()
    } else {
        source.load(&filters, pagination.offset(), filters.per_page)?
    };
    log::debug!(
        "Loaded {num_items} of {total} item(s) for {fingerprint}",
        num_items = items.len()
    );
    let response = ResponseBody::from(ResponseEnvelope::success(
        filters,
        items,
        total,
        Timestamp::now(),
    ));
    if let Some(cache) = cache {
        cache.insert(fingerprint, response.clone());
    }
    Ok(response)
}
