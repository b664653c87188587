// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use jiff::civil::Date;

use filtersync_core::{
    registry::EntityRegistry,
    validate::{RawInput, Validator},
};

use super::*;

pub type ResponseBody = filtersync_core_json::validate::ValidationReport;

#[allow(clippy::panic_in_result_fn)] // tracing::instrument
#[tracing::instrument(
    name = "Validating filters",
    skip_all,
    fields(
        request_id = %new_request_id(),
    )
)]
pub fn handle_request<R>(registry: &R, today: Date, input: &RawInput) -> Result<ResponseBody>
where
    R: EntityRegistry + ?Sized,
{
    let sanitized = Validator::new(registry, today).validate_safe(input);
    Ok(sanitized.into())
}
