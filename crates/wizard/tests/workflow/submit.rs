use std::sync::atomic::Ordering;

use chrono::NaiveDate;
use serde_json::json;

use signal_core::{EntityKind, EntityRef, ErrorKind};
use signal_query::schema::{
    DateWindow, DeliveryKind, ListField, NotificationPolicy, SelectionPolicy, Weekday,
};
use signal_wizard::{WizardError, WizardStep};

use crate::helpers::{persisted, text_query, wizard, MockSignalApi};

#[tokio::test]
async fn save_reload_edit_is_lossless() {
    let api = MockSignalApi::new();
    let mut w = wizard();

    w.query().set_raw_query("mentions of Acme AND NOT spam");
    w.query().set_name("Acme watch");
    w.enhance().await.unwrap();
    w.entities()
        .add(EntityRef::new("c-1", EntityKind::Company, "Acme"));
    {
        let mut filters = w.filters();
        filters.include(ListField::Source, "reuters");
        filters.include(ListField::Source, "ap");
        filters.exclude(ListField::Label, "spam");
        filters.include(ListField::Location, "DE");
        filters.set_date_window(DateWindow {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
        });
        filters.set_show_reprints(false);
        filters.set_selection_policy(SelectionPolicy::AiSummary {
            newsletter_format: Default::default(),
        });
    }
    w.notification().set_policy(NotificationPolicy::Digest);
    w.notification().toggle_day(Weekday::Monday);
    w.notification().toggle_day(Weekday::Thursday);
    w.alert_methods().configure(DeliveryKind::Email, "team@acme.test");

    let saved = w.draft().clone();
    let id = w.submit(&api).await.unwrap();
    assert_eq!(id, "sig-1");
    assert_eq!(w.draft().raw_query, "");
    assert_eq!(w.current_step(), WizardStep::Query);

    assert_eq!(w.open(&api, &id, WizardStep::Review).await.unwrap(), WizardStep::Review);
    let loaded = w.draft();
    assert!(loaded.is_edit_mode);
    assert_eq!(loaded.signal_id.as_deref(), Some("sig-1"));
    assert_eq!(loaded.name, saved.name);
    assert_eq!(loaded.raw_query, saved.raw_query);
    assert_eq!(loaded.enhanced_query, Some(text_query("mentions of Acme AND NOT spam")));
    assert_eq!(loaded.entities, saved.entities);
    assert_eq!(loaded.filters, saved.filters);
    assert_eq!(loaded.notification_policy, saved.notification_policy);
    assert_eq!(loaded.selection_policy, saved.selection_policy);
    assert_eq!(loaded.schedule_policy, saved.schedule_policy);
    assert_eq!(loaded.delivery_methods, saved.delivery_methods);
    assert!(loaded.validation_errors.is_empty());
}

#[tokio::test]
async fn edit_mode_submit_updates_in_place() {
    let api = MockSignalApi::new();
    api.insert(persisted(json!({
        "id": "sig-9",
        "name": "Acme",
        "rawQuery": "acme"
    })));

    let mut w = wizard();
    w.open(&api, "sig-9", WizardStep::Filters).await.unwrap();
    w.filters().exclude(ListField::Source, "tabloid-daily");
    let id = w.submit(&api).await.unwrap();

    assert_eq!(id, "sig-9");
    assert_eq!(api.creates.load(Ordering::SeqCst), 0);
    assert_eq!(api.updates.load(Ordering::SeqCst), 1);
    let stored = api.get("sig-9").unwrap();
    assert_eq!(
        stored.signal.filters.to_string(),
        r#"NOT source:in:["tabloid-daily"]"#
    );
}

#[tokio::test]
async fn blocked_submit_flags_the_failing_step() {
    let api = MockSignalApi::new();
    let mut w = wizard();
    w.query().set_raw_query("acme");
    w.notification().set_policy(NotificationPolicy::Scheduled);

    let err = w.submit(&api).await.unwrap_err();
    assert!(matches!(
        err,
        WizardError::Blocked {
            step: WizardStep::NotificationPolicy,
            kind: ErrorKind::ScheduleIncomplete,
        }
    ));
    assert_eq!(
        w.draft().error_for(WizardStep::NotificationPolicy),
        Some(ErrorKind::ScheduleIncomplete)
    );
    assert_eq!(api.creates.load(Ordering::SeqCst), 0);
    assert_eq!(w.draft().raw_query, "acme");
}

#[tokio::test]
async fn structural_errors_stop_the_save() {
    let api = MockSignalApi::new();
    let mut w = wizard();
    w.query().set_raw_query("acme");
    w.notification().set_policy(NotificationPolicy::Digest);
    w.notification().toggle_day(Weekday::Friday);
    w.notification().set_timezone("berlin");

    let err = w.submit(&api).await.unwrap_err();
    match err {
        WizardError::Invalid(errors) => {
            assert!(errors.iter().any(|e| e.path == "schedulePolicy.timezone"))
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(api.creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn open_unknown_signal_is_an_api_error() {
    let api = MockSignalApi::new();
    let mut w = wizard();
    let err = w.open(&api, "missing", WizardStep::Query).await.unwrap_err();
    assert!(matches!(err, WizardError::Api(_)));
    assert!(!w.draft().is_edit_mode);
}
