// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![cfg_attr(not(test), deny(clippy::panic_in_result_fn))]
#![cfg_attr(not(debug_assertions), deny(clippy::used_underscore_binding))]

use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

use filtersync_core::validate::ValidationError;

pub mod cache;
pub mod creatives;
pub mod source;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    BadRequest(anyhow::Error),

    #[error("invalid filters: {} violation(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = StdResult<T, Error>;

fn new_request_id() -> Uuid {
    Uuid::new_v4()
}
