//! End-to-end scenarios for the paged list, driven without any I/O.

use pagestream_core::{
    FetchError, FetchOutcome, FetchState, ListStatus, PagedList, QueryConfig, QueryGeneration,
    Record, StaleFetch, ViewportConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct Issue {
    id: u64,
    title: String,
    pull_request: bool,
}

impl Record for Issue {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn is_secondary(&self) -> bool {
        self.pull_request
    }
}

fn issue(id: u64) -> Issue {
    Issue {
        id,
        title: format!("Issue #{id}"),
        pull_request: false,
    }
}

fn page(ids: std::ops::Range<u64>) -> Vec<Issue> {
    ids.map(issue).collect()
}

fn new_list() -> PagedList<Issue> {
    // RUST_LOG=pagestream_core=debug shows the fetch bookkeeping.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut list = PagedList::new(QueryConfig::default(), ViewportConfig::default());
    list.on_resize(800.0);
    list
}

#[test]
fn test_full_page_with_pull_requests() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");

    let records: Vec<Issue> = (0..100)
        .map(|id| Issue {
            pull_request: id % 10 == 3,
            ..issue(id)
        })
        .collect();
    let outcome = list.complete_fetch(ticket, Ok(records)).expect("page accepted");

    assert_eq!(
        outcome,
        FetchOutcome::Appended {
            page: 1,
            received: 100,
            accepted: 90,
            exhausted: false
        }
    );
    assert_eq!(list.len(), 90);
    assert_eq!(list.cursor(), 1);
    assert_eq!(list.fetch_state(), &FetchState::Idle);
    assert!(list.store().iter().all(|issue| !issue.pull_request));

    list.on_scroll(list.total_size() as f64 - 800.0);
    let next = list.evaluate_prefetch().expect("next page");
    assert_eq!(list.request_for(&next).page, 2);
}

#[test]
fn test_short_page_exhausts_list() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");
    let outcome = list.complete_fetch(ticket, Ok(page(0..42))).expect("page accepted");

    assert!(matches!(outcome, FetchOutcome::Appended { exhausted: true, .. }));
    assert_eq!(list.fetch_state(), &FetchState::Exhausted);

    for scroll in [0.0, 2_000.0, 5_500.0, 6_300.0, 99_999.0] {
        list.on_scroll(scroll);
        assert!(list.evaluate_prefetch().is_none());
    }
    assert!(list.begin_fetch().is_none());
    assert_eq!(list.cursor(), 1);
}

#[test]
fn test_rapid_scrolls_issue_one_fetch() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");
    list.complete_fetch(ticket, Ok(page(0..100))).expect("page accepted");

    let bottom = list.total_size() as f64 - 800.0;
    list.on_scroll(bottom - 100.0);
    let first = list.evaluate_prefetch();
    list.on_scroll(bottom);
    let second = list.evaluate_prefetch();

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(list.fetch_state().is_in_flight());

    let ticket = first.expect("checked above");
    list.complete_fetch(ticket, Ok(page(100..200))).expect("page accepted");
    assert_eq!(list.len(), 200);
    assert_eq!(list.cursor(), 2);
}

#[test]
fn test_query_change_discards_inflight_page() {
    let mut list = new_list();
    let stale_ticket = list.evaluate_prefetch().expect("first page");

    assert!(list.set_query(QueryConfig::default().label("Type: Bug")));
    assert_eq!(list.fetch_state(), &FetchState::Idle);

    let fresh_ticket = list.evaluate_prefetch().expect("first page of new query");
    assert_eq!(fresh_ticket.generation(), QueryGeneration::new(1));

    let outcome = list
        .complete_fetch(stale_ticket, Ok(page(0..100)))
        .expect("stale results are not errors");
    assert_eq!(
        outcome,
        FetchOutcome::Discarded(StaleFetch {
            page: 1,
            issued_for: QueryGeneration::new(0),
            current: QueryGeneration::new(1),
        })
    );
    assert_eq!(list.len(), 0);
    assert!(list.fetch_state().is_in_flight());

    list.complete_fetch(fresh_ticket, Ok(page(500..520)))
        .expect("page accepted");
    assert_eq!(list.len(), 20);
    assert_eq!(list.get(0).map(|issue| issue.id), Some(500));
}

#[test]
fn test_stale_failure_does_not_fail_new_query() {
    let mut list = new_list();
    let first_stale = list.evaluate_prefetch().expect("first page");

    // Lands before the new query has fetched anything.
    assert!(list.set_query(QueryConfig::default().label("Type: Bug")));
    let outcome = list
        .complete_fetch(first_stale, Err(FetchError::Network("connection reset".into())))
        .expect("stale failures are not errors");
    assert!(matches!(outcome, FetchOutcome::Discarded(_)));
    assert_eq!(list.fetch_state(), &FetchState::Idle);
    assert_eq!(list.status(), ListStatus::Loading);

    // Lands while the new query's first page is in flight.
    let second_stale = list.evaluate_prefetch().expect("first page of second query");
    assert!(list.set_query(QueryConfig::default().label("Status: Unconfirmed")));
    let fresh_ticket = list.evaluate_prefetch().expect("first page of third query");
    let outcome = list
        .complete_fetch(second_stale, Err(FetchError::Network("timed out".into())))
        .expect("stale failures are not errors");
    assert!(matches!(outcome, FetchOutcome::Discarded(_)));
    assert!(list.fetch_state().is_in_flight());
    assert!(list.fetch_state().error().is_none());

    list.complete_fetch(fresh_ticket, Ok(page(0..100)))
        .expect("page accepted");
    assert_eq!(list.fetch_state(), &FetchState::Idle);
    assert_eq!(list.len(), 100);
}

#[test]
fn test_measurement_shifts_following_offsets() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");
    list.complete_fetch(ticket, Ok(page(0..100))).expect("page accepted");

    let before = list.sizes().offsets().to_vec();
    assert_eq!(list.sizes().size_of(37), Some(150));

    list.record_measurement(37, 220);

    let after = list.sizes().offsets();
    assert_eq!(after[37], before[37]);
    for i in 38..after.len() {
        assert_eq!(after[i], before[i] + 70, "offset {i} should shift by 70");
    }
    assert_eq!(list.total_size(), 15_070);
}

#[test]
fn test_failed_fetch_retries_same_page() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");
    list.complete_fetch(ticket, Ok(page(0..100))).expect("page accepted");

    let ticket = list.begin_fetch().expect("load more");
    let err = pagestream_core::FetchError::Http {
        status: 502,
        message: "Bad Gateway".into(),
    };
    assert_eq!(list.complete_fetch(ticket, Err(err.clone())), Err(err));
    assert_eq!(list.len(), 100);
    assert_eq!(list.cursor(), 1);

    list.on_scroll(list.total_size() as f64);
    assert!(list.evaluate_prefetch().is_none());

    assert!(list.retry());
    let ticket = list.evaluate_prefetch().expect("retry fetches again");
    assert_eq!(ticket.page(), 2);
    list.complete_fetch(ticket, Ok(page(100..150))).expect("page accepted");
    assert_eq!(list.len(), 150);
    assert!(list.fetch_state().is_exhausted());
}

#[test]
fn test_exhausted_empty_list() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");
    list.complete_fetch(ticket, Ok(Vec::new())).expect("page accepted");
    assert_eq!(list.status(), pagestream_core::ListStatus::Empty);
    assert!(list.visible_range().is_empty());
}

#[test]
fn test_duplicate_records_across_pages() {
    let mut list = new_list();
    let ticket = list.evaluate_prefetch().expect("first page");
    list.complete_fetch(ticket, Ok(page(0..100))).expect("page accepted");

    // A record shifted from page 1 onto page 2 while we were reading.
    let mut second = page(100..199);
    second.insert(0, Issue {
        title: "edited".into(),
        ..issue(99)
    });
    let ticket = list.begin_fetch().expect("page 2");
    let outcome = list.complete_fetch(ticket, Ok(second)).expect("page accepted");

    assert!(matches!(
        outcome,
        FetchOutcome::Appended {
            received: 100,
            accepted: 99,
            exhausted: false,
            ..
        }
    ));
    assert_eq!(list.get(99).map(|issue| issue.title.as_str()), Some("Issue #99"));
    assert_eq!(list.fetch_state(), &FetchState::Idle);
}
