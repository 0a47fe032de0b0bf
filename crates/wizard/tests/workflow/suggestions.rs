use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};

use signal_core::config::WizardConfig;
use signal_core::EntityKind;
use signal_wizard::Wizard;

use crate::helpers::{MockEnhancer, MockSuggester};

const DEBOUNCE: Duration = Duration::from_millis(300);

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_sends_one_request() {
    let suggester = MockSuggester::new();
    let mut w = Wizard::new(
        &WizardConfig::default(),
        MockEnhancer::new(),
        suggester.clone(),
    );

    let start = Instant::now();
    w.search_entities("a");
    sleep(Duration::from_millis(50)).await;
    w.search_entities("ac");
    sleep(Duration::from_millis(50)).await;
    w.search_entities("acm");
    sleep(Duration::from_millis(200)).await;
    w.search_entities("acme");
    let last_keystroke = Instant::now();
    assert_eq!(last_keystroke - start, Duration::from_millis(300));

    let batch = w.recv_suggestions().await.unwrap();
    assert_eq!(batch.query, "acme");
    assert!(w.apply_suggestions(batch));
    assert_eq!(w.draft().entity_suggestions[0].name, "ACME");

    // Nothing else is in flight.
    assert!(timeout(Duration::from_secs(5), w.recv_suggestions())
        .await
        .is_err());

    let requests = suggester.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].1 - last_keystroke >= DEBOUNCE);
}

#[tokio::test(start_paused = true)]
async fn stale_suggestions_are_discarded() {
    // The first request is still running when the second one is sent.
    let suggester = MockSuggester::with_slow("ac", Duration::from_secs(2));
    let mut w = Wizard::new(
        &WizardConfig::default(),
        MockEnhancer::new(),
        suggester.clone(),
    );

    w.search_entities("ac");
    sleep(DEBOUNCE + Duration::from_millis(10)).await;
    assert_eq!(suggester.request_count(), 1);

    w.search_entities("acme");
    let fresh = w.recv_suggestions().await.unwrap();
    assert_eq!(fresh.query, "acme");
    assert!(w.apply_suggestions(fresh));

    // The dispatched request was not cancelled; its late answer is ignored.
    let late = w.recv_suggestions().await.unwrap();
    assert_eq!(late.query, "ac");
    let before = w.draft().clone();
    assert!(!w.apply_suggestions(late));
    assert_eq!(*w.draft(), before);
    assert_eq!(w.draft().entity_suggestions[0].id, "id-acme");

    w.entities().accept_suggestion("id-acme", EntityKind::Company);
    assert_eq!(w.draft().entities.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_discards_results_in_flight() {
    let suggester = MockSuggester::with_slow("ac", Duration::from_secs(2));
    let mut w = Wizard::new(
        &WizardConfig::default(),
        MockEnhancer::new(),
        suggester.clone(),
    );

    w.search_entities("ac");
    sleep(DEBOUNCE + Duration::from_millis(10)).await;
    assert_eq!(suggester.request_count(), 1);

    w.search_entities("");
    let late = w.recv_suggestions().await.unwrap();
    assert_eq!(late.query, "ac");
    assert!(!w.apply_suggestions(late));
    assert!(w.draft().entity_suggestions.is_empty());
    assert_eq!(suggester.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_keystrokes() {
    let suggester = MockSuggester::new();
    let mut w = Wizard::new(
        &WizardConfig::default(),
        MockEnhancer::new(),
        suggester.clone(),
    );

    w.search_entities("acme");
    sleep(Duration::from_millis(100)).await;
    w.cancel();

    assert!(timeout(Duration::from_secs(5), w.recv_suggestions())
        .await
        .is_err());
    assert_eq!(suggester.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn configured_delay_is_used() {
    let suggester = MockSuggester::new();
    let config = WizardConfig {
        suggest_debounce_ms: 1000,
        ..WizardConfig::default()
    };
    let mut w = Wizard::new(&config, MockEnhancer::new(), suggester.clone());

    let typed = Instant::now();
    w.search_entities("acme");
    let batch = w.recv_suggestions().await.unwrap();
    assert!(w.apply_suggestions(batch));

    let requests = suggester.requests.lock().unwrap();
    assert!(requests[0].1 - typed >= Duration::from_millis(1000));
}
