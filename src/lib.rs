// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Filter state synchronization between the URL, a client-side store
//! and the server.
//!
//! The domain model is always available. Serialization, request handling
//! and the client-side coordinator are enabled by features.

pub use filtersync_core;

#[cfg(feature = "json")]
pub use filtersync_core_json;

#[cfg(feature = "backend")]
pub use filtersync_backend_webapi_json;

#[cfg(feature = "client")]
pub use filtersync_client;
