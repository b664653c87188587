// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use jiff::Timestamp;
use parking_lot::Mutex;
use tokio::time::sleep;

use filtersync_core::{
    registry::{EntityKind, RegistrySnapshot},
    response::ResponseEnvelope,
};

use crate::{
    fetch::FetchResponse,
    location::{MemoryLocation, UrlLocation as _},
};

use super::*;

const SLOW_KEYWORD: &str = "slow";

const SLOW_RESPONSE_DELAY: Duration = Duration::from_millis(500);

const RESPONSE_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct StubBackendState {
    requested: Vec<FilterSet>,
    failing: bool,
}

/// Answers every request with a single item that echoes the keyword.
#[derive(Debug, Default)]
struct StubBackend {
    state: Mutex<StubBackendState>,
}

impl StubBackend {
    fn requested_keywords(&self) -> Vec<String> {
        self.state
            .lock()
            .requested
            .iter()
            .map(|filters| filters.keyword.clone())
            .collect()
    }

    fn requested_countries(&self) -> Vec<String> {
        self.state
            .lock()
            .requested
            .iter()
            .map(|filters| filters.country.clone())
            .collect()
    }

    fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }
}

impl FetchBackend for StubBackend {
    fn fetch(
        &self,
        filters: FilterSet,
    ) -> impl Future<Output = anyhow::Result<FetchResponse>> + Send {
        let failing = {
            let mut state = self.state.lock();
            state.requested.push(filters.clone());
            state.failing
        };
        let delay = if filters.keyword.starts_with(SLOW_KEYWORD) {
            SLOW_RESPONSE_DELAY
        } else {
            RESPONSE_DELAY
        };
        async move {
            sleep(delay).await;
            if failing {
                anyhow::bail!("service unavailable");
            }
            let item = serde_json::json!({ "keyword": filters.keyword });
            Ok(ResponseEnvelope::success(
                filters,
                vec![item],
                1,
                Timestamp::UNIX_EPOCH,
            ))
        }
    }
}

fn registry() -> Arc<dyn EntityRegistry + Send + Sync> {
    Arc::new(RegistrySnapshot::default().with_codes(EntityKind::Country, ["US", "DE"]))
}

fn spawn_coordinator(query: &str) -> (Coordinator, Arc<StubBackend>, Arc<MemoryLocation>) {
    let backend = Arc::new(StubBackend::default());
    let location = Arc::new(MemoryLocation::new(query));
    let coordinator = Coordinator::spawn(
        CoordinatorConfig::default(),
        registry(),
        Arc::clone(&backend),
        Arc::clone(&location),
    );
    (coordinator, backend, location)
}

/// Let all pending timers and tasks finish.
async fn settle() {
    sleep(Duration::from_secs(2)).await;
}

fn snapshot(coordinator: &Coordinator) -> Snapshot {
    Snapshot::clone(&coordinator.read())
}

fn displayed_keyword(snapshot: &Snapshot) -> Option<&str> {
    snapshot.items.first()?.get("keyword")?.as_str()
}

#[tokio::test(start_paused = true)]
async fn initialize_fetches_filters_of_location() {
    let (coordinator, backend, location) = spawn_coordinator("cr_country=DE&utm_source=mail");
    assert_eq!(Phase::Uninitialized, snapshot(&coordinator).phase);

    coordinator.initialize();
    settle().await;

    assert_eq!(vec!["DE".to_owned()], backend.requested_countries());
    let snapshot = snapshot(&coordinator);
    assert_eq!(Phase::Idle, snapshot.phase);
    assert_eq!(Some(ResponseStatus::Success), snapshot.status);
    assert_eq!("DE", snapshot.filters.country);
    assert_eq!(1, snapshot.items.len());
    // Nothing to correct
    assert_eq!(0, location.replaced_count());
}

#[tokio::test(start_paused = true)]
async fn rapid_keyword_edits_result_in_a_single_fetch() {
    let (coordinator, backend, location) = spawn_coordinator("utm_source=mail");
    coordinator.initialize();
    settle().await;
    assert_eq!(vec![String::new()], backend.requested_keywords());

    for keyword in ["s", "sh", "sho", "shoe", "shoes"] {
        coordinator.update_filters(FilterUpdate::SetKeyword(keyword.to_owned()));
        sleep(Duration::from_millis(100)).await;
    }
    settle().await;

    assert_eq!(
        vec![String::new(), "shoes".to_owned()],
        backend.requested_keywords()
    );
    assert_eq!(1, location.replaced_count());
    assert_eq!(
        "utm_source=mail&cr_searchKeyword=shoes",
        location.read_query()
    );
    let snapshot = snapshot(&coordinator);
    assert_eq!(Phase::Idle, snapshot.phase);
    assert_eq!(Some("shoes"), displayed_keyword(&snapshot));
}

#[tokio::test(start_paused = true)]
async fn out_of_order_responses_keep_the_latest_filters() {
    let (coordinator, backend, _location) = spawn_coordinator("");
    coordinator.initialize();
    settle().await;

    // The slow request is dispatched after the debounce delay and
    // finishes after the fast one.
    coordinator.update_filters(FilterUpdate::SetKeyword(SLOW_KEYWORD.to_owned()));
    sleep(Duration::from_millis(400)).await;
    assert_eq!(Phase::Fetching, snapshot(&coordinator).phase);
    coordinator.update_filters(FilterUpdate::SetKeyword("fast".to_owned()));
    settle().await;

    assert_eq!(
        vec![String::new(), SLOW_KEYWORD.to_owned(), "fast".to_owned()],
        backend.requested_keywords()
    );
    let snapshot = snapshot(&coordinator);
    assert_eq!("fast", snapshot.filters.keyword);
    assert_eq!(Some("fast"), displayed_keyword(&snapshot));
    assert_eq!(Phase::Idle, snapshot.phase);
}

#[tokio::test(start_paused = true)]
async fn history_navigation_updates_the_store() {
    let (coordinator, backend, location) = spawn_coordinator("");
    coordinator.initialize();
    settle().await;

    location.navigate("cr_country=US");
    coordinator.url_changed(location.read_query());
    settle().await;

    let snapshot = snapshot(&coordinator);
    assert_eq!("US", snapshot.filters.country);
    assert_eq!(
        vec!["default".to_owned(), "US".to_owned()],
        backend.requested_countries()
    );
    // The location is not written back
    assert_eq!(0, location.replaced_count());
    assert_eq!("cr_country=US", location.read_query());
}

#[tokio::test(start_paused = true)]
async fn retry_after_failure() {
    let (coordinator, backend, _location) = spawn_coordinator("");
    coordinator.initialize();
    settle().await;

    backend.set_failing(true);
    coordinator.update_filters(FilterUpdate::SetCountry("US".to_owned()));
    settle().await;
    let failed = snapshot(&coordinator);
    assert_eq!(Some(ResponseStatus::Error), failed.status);
    assert_eq!(Some("service unavailable"), failed.error.as_deref());
    // The items of the previous response are still displayed
    assert_eq!(1, failed.items.len());

    backend.set_failing(false);
    coordinator.retry();
    settle().await;
    let recovered = snapshot(&coordinator);
    assert_eq!(Some(ResponseStatus::Success), recovered.status);
    assert!(recovered.error.is_none());
    assert_eq!(3, backend.requested_countries().len());
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_changes() {
    let (coordinator, _backend, _location) = spawn_coordinator("");
    let mut subscriber = coordinator.subscribe();
    assert_eq!(Phase::Uninitialized, subscriber.read_ack().phase);

    coordinator.initialize();
    assert!(subscriber.changed().await.is_ok());
    assert_ne!(Phase::Uninitialized, subscriber.read_ack().phase);
}
