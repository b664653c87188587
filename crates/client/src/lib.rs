// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Client-side synchronization of filters between the URL, the store
//! and the server.

pub mod cache;

pub mod config;
pub use self::config::CoordinatorConfig;

pub mod coordinator;
pub use self::coordinator::{
    Coordinator, FilterUpdate, Intent, Phase, Snapshot, SyncLoopDetected,
};

pub mod fetch;
#[cfg(feature = "webapi-backend")]
pub use self::fetch::WebApiBackend;
pub use self::fetch::{FetchBackend, FetchResponse, Item};

pub mod location;
pub use self::location::{MemoryLocation, UrlLocation};

pub mod loop_guard;
