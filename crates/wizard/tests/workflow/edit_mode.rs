use serde_json::json;

use signal_core::ErrorKind;
use signal_query::schema::{
    ClauseOperator, ListField, NotificationPolicy, QueryNode, SchedulePolicy,
};
use signal_wizard::{reconstruct, CommitError, WizardStep};

use crate::helpers::{persisted, wizard};

fn scheduled_without_schedule() -> signal_query::schema::PersistedSignal {
    persisted(json!({
        "id": "sig-42",
        "name": "Weekly Acme",
        "rawQuery": "mentions of Acme",
        "notificationPolicy": "SCHEDULED",
        "schedulePolicy": null
    }))
}

#[test]
fn scheduled_without_schedule_is_flagged_and_blocks() {
    let signal = scheduled_without_schedule();
    let r = reconstruct(&signal, WizardStep::Query);
    assert!(r.draft.is_edit_mode);
    assert_eq!(
        r.draft.error_for(WizardStep::NotificationPolicy),
        Some(ErrorKind::ScheduleIncomplete)
    );

    let mut w = wizard();
    w.edit(&signal, WizardStep::Query);
    assert_eq!(w.advance(), Ok(WizardStep::Entities));
    assert_eq!(w.advance(), Ok(WizardStep::Filters));
    assert_eq!(w.advance(), Ok(WizardStep::NotificationPolicy));
    assert_eq!(
        w.advance(),
        Err(CommitError::Blocked(ErrorKind::ScheduleIncomplete))
    );
    assert_eq!(w.current_step(), WizardStep::NotificationPolicy);

    w.notification().set_schedule(Some(SchedulePolicy::new(
        [signal_query::schema::Weekday::Wednesday],
        chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
    )));
    assert_eq!(w.draft().error_for(WizardStep::NotificationPolicy), None);
    assert_eq!(w.advance(), Ok(WizardStep::AlertMethods));
}

#[test]
fn edit_can_start_on_the_notification_step() {
    let mut w = wizard();
    let start = w.edit(&scheduled_without_schedule(), WizardStep::NotificationPolicy);
    assert_eq!(start, WizardStep::NotificationPolicy);

    w.notification().set_policy(NotificationPolicy::Immediate);
    assert_eq!(w.advance(), Ok(WizardStep::AlertMethods));
    assert_eq!(w.back(), WizardStep::NotificationPolicy);
}

#[test]
fn unknown_clauses_are_kept_and_do_not_block() {
    let sentiment = json!({"field": "sentiment", "operator": "between", "value": [-1, 0]});
    let signal = persisted(json!({
        "id": "sig-7",
        "name": "Acme",
        "rawQuery": "acme",
        "filters": {"op": "AND", "children": [
            {"field": "source", "operator": "in", "value": ["reuters"]},
            sentiment
        ]}
    }));

    let mut w = wizard();
    w.edit(&signal, WizardStep::Filters);
    assert_eq!(
        w.draft().error_for(WizardStep::Filters),
        Some(ErrorKind::PartialReconstruction)
    );
    assert_eq!(w.filters().unrecognized_count(), 1);

    w.filters().include(ListField::Label, "earnings");
    assert_eq!(w.advance(), Ok(WizardStep::NotificationPolicy));
    assert_eq!(
        w.draft().error_for(WizardStep::Filters),
        Some(ErrorKind::PartialReconstruction)
    );

    let node: QueryNode = serde_json::from_value(sentiment).unwrap();
    let payload = w.review().payload();
    assert!(payload.filters.contains(&node));
    assert!(payload.filters.contains(&QueryNode::clause(
        "source",
        ClauseOperator::In,
        json!(["reuters"])
    )));
}

#[test]
fn original_filters_track_changes() {
    let signal = persisted(json!({
        "id": "sig-8",
        "name": "Acme",
        "rawQuery": "acme",
        "filters": {"op": "AND", "children": [
            {"field": "hide_reprints", "operator": "exists"}
        ]}
    }));
    let mut w = wizard();
    w.edit(&signal, WizardStep::Filters);
    assert!(!w.draft().filters.show_reprints);
    assert!(!w.draft().filters_changed());

    w.filters().set_show_reprints(true);
    assert!(w.draft().filters_changed());
    assert!(w.filters().discard_changes());
    assert!(!w.draft().filters_changed());
}

#[tokio::test]
async fn loading_a_signal_makes_pending_enhancement_stale() {
    let mut w = wizard();
    w.query().set_raw_query("draft text");
    let request = w.prepare_enhancement().unwrap();
    w.edit(&scheduled_without_schedule(), WizardStep::Query);

    let outcome = request.send().await;
    assert!(w.apply_enhancement(outcome).is_err());
    assert_eq!(w.draft().raw_query, "mentions of Acme");
    assert!(w.draft().enhanced_query.is_none());
}
