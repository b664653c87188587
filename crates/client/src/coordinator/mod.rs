// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Keeps the filters of the URL, the store and the server in sync.
//!
//! All state transitions happen in [`State::update()`], driven by a
//! single message loop. Intents arrive from the outside, effects are
//! the results of asynchronous tasks.

use std::{
    ops::{Add, AddAssign},
    sync::Arc,
    time::Duration,
};

use discro::{Publisher, Ref, Subscriber};
use thiserror::Error;
use tokio::sync::mpsc;

use filtersync_core::{
    filter::FilterSet,
    pagination::PaginationInfo,
    registry::EntityRegistry,
    response::{ResponseMeta, ResponseStatus},
};

use crate::{
    config::CoordinatorConfig,
    fetch::{FetchBackend, Item},
    location::UrlLocation,
};

pub mod effect;
pub use self::effect::Effect;

pub mod intent;
pub use self::intent::{FilterUpdate, Intent};

pub mod state;
pub use self::state::State;

pub mod task;
pub use self::task::Task;

mod messaging;
use self::messaging::{Environment, MessageSender, message_loop, send_message};

#[derive(Debug)]
pub enum Message {
    Intent(Intent),
    Effect(Effect),
}

impl From<Intent> for Message {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}

impl From<Effect> for Message {
    fn from(effect: Effect) -> Self {
        Self::Effect(effect)
    }
}

#[derive(Debug)]
pub enum Action {
    /// Apply an effect immediately, without suspending.
    ApplyEffect(Effect),
    DispatchTask(Task),
}

impl From<Effect> for Action {
    fn from(effect: Effect) -> Self {
        Self::ApplyEffect(effect)
    }
}

impl From<Task> for Action {
    fn from(task: Task) -> Self {
        Self::DispatchTask(task)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMutation {
    Unchanged,
    MaybeChanged,
}

impl Add for StateMutation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        if self == Self::Unchanged && rhs == Self::Unchanged {
            Self::Unchanged
        } else {
            Self::MaybeChanged
        }
    }
}

impl AddAssign for StateMutation {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[derive(Debug)]
pub struct StateUpdated {
    pub state_mutation: StateMutation,
    pub next_actions: Vec<Action>,
}

impl StateUpdated {
    #[must_use]
    pub const fn unchanged() -> Self {
        Self {
            state_mutation: StateMutation::Unchanged,
            next_actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn maybe_changed(next_actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            state_mutation: StateMutation::MaybeChanged,
            next_actions: next_actions.into_iter().collect(),
        }
    }
}

/// The side that triggered a propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Store,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Idle,

    /// Waiting for a debounce delay to elapse.
    Syncing,

    /// Waiting for the response of the current filters.
    Fetching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("synchronization loop detected: more than {max_syncs} propagations within {window:?}")]
pub struct SyncLoopDetected {
    pub max_syncs: usize,
    pub window: Duration,
}

/// Observable state of the coordinator.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub filters: FilterSet,

    /// `None` until the first response has been received.
    pub status: Option<ResponseStatus>,

    /// The items and pagination of the last successful response.
    pub items: Vec<Item>,
    pub pagination: PaginationInfo,
    pub meta: Option<ResponseMeta>,

    /// The last error, only set while [`Self::status`] is
    /// [`ResponseStatus::Error`].
    pub error: Option<String>,

    /// Synchronization has been disabled.
    pub sync_loop_detected: Option<SyncLoopDetected>,
}

/// Handle of a spawned message loop.
///
/// The message loop terminates after the handle has been dropped and
/// all pending tasks have finished.
#[derive(Debug)]
pub struct Coordinator {
    message_tx: MessageSender,
    state_pub: Arc<Publisher<Snapshot>>,
}

impl Coordinator {
    /// Spawn the message loop onto the current Tokio runtime.
    ///
    /// Nothing happens until [`Self::initialize()`] is invoked.
    #[must_use]
    pub fn spawn<B, L>(
        config: CoordinatorConfig,
        registry: Arc<dyn EntityRegistry + Send + Sync>,
        backend: B,
        location: L,
    ) -> Self
    where
        B: FetchBackend + Send + Sync + 'static,
        L: UrlLocation + Send + Sync + 'static,
    {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let state = State::new(config, registry);
        let state_pub = Arc::new(Publisher::new(state.snapshot()));
        let shared_env = Arc::new(Environment::new(backend, location));
        tokio::spawn(message_loop(
            shared_env,
            message_tx.downgrade(),
            message_rx,
            state,
            Arc::clone(&state_pub),
        ));
        Self {
            message_tx,
            state_pub,
        }
    }

    pub fn send(&self, intent: impl Into<Intent>) {
        send_message(&self.message_tx, Message::Intent(intent.into()));
    }

    /// Read the current location and fetch the initial results.
    pub fn initialize(&self) {
        self.send(Intent::Initialize);
    }

    pub fn update_filters(&self, update: FilterUpdate) {
        self.send(Intent::UpdateFilters(update));
    }

    /// Notify about a changed location, e.g. after navigating back.
    pub fn url_changed(&self, query: impl Into<String>) {
        self.send(Intent::UrlChanged {
            query: query.into(),
        });
    }

    /// Fetch the current filters again, bypassing the response cache.
    pub fn retry(&self) {
        self.send(Intent::Retry);
    }

    #[must_use]
    pub fn read(&self) -> Ref<'_, Snapshot> {
        self.state_pub.read()
    }

    #[must_use]
    pub fn subscribe(&self) -> Subscriber<Snapshot> {
        self.state_pub.subscribe()
    }
}

#[cfg(test)]
mod tests;
