use std::sync::Arc;

use serde_json::json;

use signal_core::config::{Config, WizardConfig};
use signal_core::ErrorKind;
use signal_query::schema::{ClauseOperator, QueryNode, StructuredQuery};
use signal_wizard::{Wizard, WizardError, WizardStep};

use crate::helpers::{text_query, wizard_with, FixedEnhancer, MockEnhancer, MockSuggester};

#[tokio::test]
async fn empty_query_is_rejected_before_any_request() {
    let enhancer = MockEnhancer::new();
    let mut w = wizard_with(enhancer.clone());
    w.query().set_raw_query("   ");

    let err = w.enhance().await.unwrap_err();
    assert!(matches!(err, WizardError::Rejected(ErrorKind::EmptyQuery)));
    assert_eq!(enhancer.calls(), 0);
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::EmptyQuery)
    );

    w.query().set_raw_query("acme");
    assert_eq!(w.draft().error_for(WizardStep::Query), None);
}

#[tokio::test]
async fn success_writes_the_enhanced_query() {
    let enhancer = MockEnhancer::new();
    let mut w = wizard_with(enhancer.clone());
    w.query().set_raw_query("  mentions of Acme ");

    let query = w.enhance().await.unwrap();
    assert_eq!(query, text_query("mentions of Acme"));
    assert_eq!(w.draft().enhanced_query.as_ref(), Some(&query));
    assert_eq!(enhancer.calls(), 1);
}

#[tokio::test]
async fn failure_never_reuses_the_old_result_and_is_not_retried() {
    let enhancer = MockEnhancer::new();
    let mut w = wizard_with(enhancer.clone());
    w.query().set_raw_query("acme");
    w.enhance().await.unwrap();

    enhancer.set_failing(true);
    w.query().set_raw_query("acme AND globex");
    let err = w.enhance().await.unwrap_err();
    assert!(matches!(err, WizardError::Enhancement(_)));
    assert_eq!(enhancer.calls(), 2);
    assert_eq!(w.query().enhanced_query(), None);
    assert_eq!(w.review().payload().query, None);
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::EnhancementFailed)
    );

    // Editing does not clear the notice, and it does not block continuing.
    w.query().set_raw_query("acme AND globex corp");
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::EnhancementFailed)
    );
    assert_eq!(w.advance(), Ok(WizardStep::Entities));
    assert_eq!(enhancer.calls(), 2);

    enhancer.set_failing(false);
    w.enhance().await.unwrap();
    assert_eq!(w.draft().error_for(WizardStep::Query), None);
    assert_eq!(
        w.review().payload().query,
        Some(text_query("acme AND globex corp"))
    );
}

#[tokio::test]
async fn editing_the_text_detaches_the_enhancement() {
    let mut w = wizard_with(MockEnhancer::new());
    w.query().set_raw_query("acme");
    w.enhance().await.unwrap();
    assert_eq!(w.review().payload().query, Some(text_query("acme")));

    w.query().set_raw_query("globex");
    assert_eq!(w.query().enhanced_query(), None);
    assert_eq!(w.review().payload().query, None);

    // Typing the old text back makes the old result current again.
    w.query().set_raw_query(" acme ");
    assert_eq!(w.query().enhanced_query(), Some(&text_query("acme")));
}

#[tokio::test]
async fn superseded_response_does_not_touch_the_draft() {
    let mut w = wizard_with(MockEnhancer::new());
    w.query().set_raw_query("first");
    let a = w.prepare_enhancement().unwrap();
    w.query().set_raw_query("second");
    let b = w.prepare_enhancement().unwrap();
    assert!(a.token() < b.token());

    let outcome_b = b.send().await;
    let outcome_a = a.send().await;

    let before = w.draft().clone();
    assert!(matches!(
        w.apply_enhancement(outcome_a),
        Err(WizardError::Stale)
    ));
    assert_eq!(*w.draft(), before);

    let applied = w.apply_enhancement(outcome_b).unwrap();
    assert_eq!(applied, text_query("second"));
}

#[tokio::test]
async fn cancel_discards_in_flight_enhancement() {
    let mut w = wizard_with(MockEnhancer::new());
    w.query().set_raw_query("acme");
    let request = w.prepare_enhancement().unwrap();

    w.cancel();
    let outcome = request.send().await;
    assert!(matches!(w.apply_enhancement(outcome), Err(WizardError::Stale)));
    assert_eq!(w.draft().raw_query, "");
    assert!(w.draft().enhanced_query.is_none());
    assert_eq!(w.current_step(), WizardStep::Query);
}

#[tokio::test]
async fn results_over_the_configured_depth_are_failures() {
    let deep = StructuredQuery::and(vec![QueryNode::or(vec![QueryNode::clause(
        "text",
        ClauseOperator::Eq,
        json!("acme"),
    )])]);
    let config = WizardConfig {
        max_query_depth: 2,
        ..WizardConfig::default()
    };
    let mut w = Wizard::new(&config, Arc::new(FixedEnhancer(deep)), MockSuggester::new());
    w.query().set_raw_query("acme");

    assert!(matches!(w.enhance().await, Err(WizardError::Enhancement(_))));
    assert!(w.draft().enhanced_query.is_none());
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::EnhancementFailed)
    );
}

#[tokio::test]
async fn from_config_starts_on_an_empty_query_step() {
    let mut config = Config::for_profile("SIGNAL_WIZARD_TEST_UNSET");
    config.enhance.url = Some("http://127.0.0.1:9/nlp".into());
    config.wizard.max_query_depth = 3;

    let wizard = Wizard::from_config(&config).expect("http enhancer needs no credentials");
    assert_eq!(wizard.current_step(), WizardStep::Query);
    assert!(wizard.draft().raw_query.is_empty());
}

#[test]
fn from_config_without_any_backend_fails() {
    let mut config = Config::for_profile("SIGNAL_WIZARD_TEST_UNSET");
    config.enhance.url = None;
    config.llm.openai_api_key = None;

    assert!(matches!(
        Wizard::from_config(&config),
        Err(WizardError::Enhancement(_))
    ));
}
