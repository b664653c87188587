// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::VecDeque, sync::Arc};

use discro::Publisher;
use tokio::sync::mpsc;

use crate::{fetch::FetchBackend, location::UrlLocation};

use super::{Action, Message, Snapshot, State, StateMutation, StateUpdated, Task};

pub(super) type MessageSender = mpsc::UnboundedSender<Message>;
pub(super) type WeakMessageSender = mpsc::WeakUnboundedSender<Message>;
pub(super) type MessageReceiver = mpsc::UnboundedReceiver<Message>;

pub(super) fn send_message(message_tx: &MessageSender, message: impl Into<Message>) {
    let message = message.into();
    log::debug!("Sending message: {message:?}");
    if let Err(message) = message_tx.send(message) {
        // Channel is closed, i.e. receiver has been dropped
        log::debug!("Failed to send message: {:?}", message.0);
    }
}

/// Collaborators of all tasks.
#[derive(Debug)]
pub(super) struct Environment<B, L> {
    backend: B,
    location: L,
}

impl<B, L> Environment<B, L>
where
    B: FetchBackend + Send + Sync + 'static,
    L: UrlLocation + Send + Sync + 'static,
{
    pub(super) const fn new(backend: B, location: L) -> Self {
        Self { backend, location }
    }

    fn dispatch_task(self: &Arc<Self>, message_tx: MessageSender, task: Task) {
        let shared_self = Arc::clone(self);
        tokio::spawn(async move {
            let Self { backend, location } = &*shared_self;
            if let Some(effect) = task.execute(backend, location).await {
                send_message(&message_tx, Message::Effect(effect));
            }
        });
    }
}

fn handle_next_message<B, L>(
    shared_env: &Arc<Environment<B, L>>,
    state: &mut State,
    message_tx: &WeakMessageSender,
    next_message: Message,
) -> StateMutation
where
    B: FetchBackend + Send + Sync + 'static,
    L: UrlLocation + Send + Sync + 'static,
{
    let StateUpdated {
        mut state_mutation,
        next_actions,
    } = state.update(next_message);
    let mut next_actions = VecDeque::from(next_actions);
    let mut number_of_tasks_dispatched = 0;
    while let Some(next_action) = next_actions.pop_front() {
        match next_action {
            Action::ApplyEffect(effect) => {
                log::debug!("Applying subsequent effect immediately: {effect:?}");
                let StateUpdated {
                    state_mutation: next_state_mutation,
                    next_actions: subsequent_actions,
                } = state.update(Message::Effect(effect));
                state_mutation += next_state_mutation;
                next_actions.extend(subsequent_actions);
            }
            Action::DispatchTask(task) => {
                let Some(message_tx) = message_tx.upgrade() else {
                    log::debug!("Discarding task after shutdown: {task:?}");
                    continue;
                };
                log::debug!("Dispatching task asynchronously: {task:?}");
                shared_env.dispatch_task(message_tx, task);
                number_of_tasks_dispatched += 1;
            }
        }
    }
    log::trace!("number_of_tasks_dispatched = {number_of_tasks_dispatched}");
    state_mutation
}

pub(super) async fn message_loop<B, L>(
    shared_env: Arc<Environment<B, L>>,
    message_tx: WeakMessageSender,
    mut message_rx: MessageReceiver,
    mut state: State,
    state_pub: Arc<Publisher<Snapshot>>,
) -> State
where
    B: FetchBackend + Send + Sync + 'static,
    L: UrlLocation + Send + Sync + 'static,
{
    while let Some(next_message) = message_rx.recv().await {
        match handle_next_message(&shared_env, &mut state, &message_tx, next_message) {
            StateMutation::MaybeChanged => {
                state_pub.write(state.snapshot());
            }
            StateMutation::Unchanged => (),
        }
    }
    log::debug!("Terminated message loop");
    state
}
