use serde_json::json;

use signal_core::ErrorKind;
use signal_query::schema::{
    AnomalyConfig, DeliveryKind, NotificationPolicy, SearchScope, SelectionPolicy, Weekday,
};
use signal_wizard::{CommitError, StepController, WizardStep};

use crate::helpers::{persisted, wizard};

#[test]
fn acme_query_passes_with_all_content() {
    let mut w = wizard();
    let mut query = w.query();
    query.set_raw_query("mentions of Acme AND NOT spam");
    query.set_scope(SearchScope::All);

    assert_eq!(query.validate(), None);
    assert!(query.highlight().report.error_spans.is_empty());
    assert_eq!(w.advance(), Ok(WizardStep::Entities));
}

#[test]
fn empty_query_with_template_needs_workflow_query() {
    let mut w = wizard();
    w.query().set_scope(SearchScope::Template {
        template_id: "competitor-watch".into(),
    });
    w.query().set_raw_query("");

    assert_eq!(
        w.query().validate(),
        Some(ErrorKind::QueryRequiredForWorkflow)
    );
    assert_eq!(
        w.advance(),
        Err(CommitError::Blocked(ErrorKind::QueryRequiredForWorkflow))
    );
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::QueryRequiredForWorkflow)
    );

    // Typing clears the error without another "continue".
    w.query().set_raw_query("Acme");
    assert_eq!(w.draft().error_for(WizardStep::Query), None);
}

#[test]
fn switching_scope_updates_the_attached_message() {
    let mut w = wizard();
    assert!(w.advance().is_err());
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::QueryRequired)
    );
    w.query().set_scope(SearchScope::Template {
        template_id: "earnings".into(),
    });
    assert_eq!(
        w.draft().error_for(WizardStep::Query),
        Some(ErrorKind::QueryRequiredForWorkflow)
    );
}

/// A saved signal that fails every step check that can fail.
fn broken_signal() -> signal_query::schema::PersistedSignal {
    persisted(json!({
        "id": "sig-broken",
        "name": "broken",
        "rawQuery": "  ",
        "filters": {"op": "AND", "children": [
            {"field": "published_at", "operator": "gte", "value": "2024-06-01"},
            {"field": "published_at", "operator": "lte", "value": "2024-01-01"}
        ]},
        "selectionPolicy": {"type": "TOP_N", "maxItems": 5},
        "notificationPolicy": "SCHEDULED",
        "deliveryMethods": [{"type": "webhook"}]
    }))
}

#[test]
fn commit_is_a_no_op_whenever_validate_fails() {
    let signal = broken_signal();
    let mut w = wizard();

    for step in WizardStep::ALL {
        w.edit(&signal, step);
        assert_eq!(w.current_step(), step);
        let before = w.draft().clone();

        let mut controller = w.controller(step);
        let Some(kind) = controller.validate() else {
            assert_eq!(step, WizardStep::Entities);
            continue;
        };
        assert_eq!(controller.commit(), Err(CommitError::Blocked(kind)));
        drop(controller);

        assert_eq!(*w.draft(), before, "draft changed on {step}");
        assert_eq!(w.current_step(), step);
    }
}

#[test]
fn back_never_validates() {
    let mut w = wizard();
    w.query().set_raw_query("acme");
    w.advance().unwrap();
    w.advance().unwrap();
    assert_eq!(w.current_step(), WizardStep::Filters);

    w.query().set_raw_query("");
    assert_eq!(w.back(), WizardStep::Entities);
    assert_eq!(w.back(), WizardStep::Query);
    assert_eq!(w.back(), WizardStep::Query);
    assert!(w.draft().validation_errors.is_empty());
}

#[test]
fn full_walk_visits_anomaly_only_for_top_n() {
    let mut w = wizard();
    w.query().set_raw_query("acme");
    w.advance().unwrap();
    w.advance().unwrap();
    assert_eq!(w.advance(), Ok(WizardStep::NotificationPolicy));
    assert_eq!(w.back(), WizardStep::Filters);

    w.filters()
        .set_selection_policy(SelectionPolicy::TopN { max_items: 10 });
    assert_eq!(w.advance(), Ok(WizardStep::Anomaly));
    assert_eq!(
        w.advance(),
        Err(CommitError::Blocked(ErrorKind::AnomalyConfigInvalid))
    );
    w.anomaly().set_config(AnomalyConfig {
        volume_field: "mentions".into(),
        threshold: 1.5,
    });
    assert_eq!(w.advance(), Ok(WizardStep::NotificationPolicy));

    w.notification().set_policy(NotificationPolicy::Digest);
    assert!(w.advance().is_err());
    w.notification().toggle_day(Weekday::Monday);
    assert_eq!(w.advance(), Ok(WizardStep::AlertMethods));

    w.alert_methods().enable(DeliveryKind::Slack);
    assert_eq!(
        w.advance(),
        Err(CommitError::Blocked(ErrorKind::NoDeliveryMethodSelected))
    );
    w.alert_methods().configure(DeliveryKind::Slack, "#newsroom");
    assert_eq!(w.advance(), Ok(WizardStep::Review));
    assert_eq!(w.advance(), Ok(WizardStep::Review));
    assert!(w.draft().validation_errors.is_empty());
}

#[test]
fn go_to_forward_stops_at_first_failing_step() {
    let mut w = wizard();
    w.query().set_raw_query("acme");
    w.notification().set_policy(NotificationPolicy::Scheduled);

    assert_eq!(
        w.go_to(WizardStep::Review),
        Err(CommitError::Blocked(ErrorKind::ScheduleIncomplete))
    );
    assert_eq!(w.current_step(), WizardStep::NotificationPolicy);
    assert_eq!(w.go_to(WizardStep::Query), Ok(WizardStep::Query));
}

#[test]
fn go_to_skipped_anomaly_lands_on_next_step() {
    let mut w = wizard();
    w.query().set_raw_query("acme");
    assert_eq!(
        w.go_to(WizardStep::Anomaly),
        Ok(WizardStep::NotificationPolicy)
    );
}
