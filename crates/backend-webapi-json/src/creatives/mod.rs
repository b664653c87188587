// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use filtersync_core::validate::RawInput;

use super::*;

pub mod query;
pub mod validate;

/// Parse the query string of a GET request.
#[must_use]
pub fn request_input_from_query(query: &str) -> RawInput {
    RawInput::from_query(query)
}

/// Parse the JSON body of a POST request.
pub fn request_input_from_json(body: serde_json::Value) -> Result<RawInput> {
    filtersync_core_json::validate::raw_input_from_json(body).map_err(Error::BadRequest)
}
