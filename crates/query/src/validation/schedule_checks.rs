//! Schedule validation: presence for scheduled policies, days, and timezones.

use crate::schema::*;

use super::ValidationResult;

pub(super) fn validate_schedule(payload: &SignalPayload, result: &mut ValidationResult) {
    let policy = payload.notification_policy;

    let Some(schedule) = &payload.schedule_policy else {
        if policy.requires_schedule() {
            result.error(
                "schedulePolicy",
                format!("{policy:?} notifications require a schedule"),
            );
        }
        return;
    };

    if !policy.requires_schedule() {
        result.warn(
            "schedulePolicy",
            "Schedule is ignored for immediate notifications",
        );
    }

    if schedule.days.is_empty() {
        result.error("schedulePolicy.days", "Pick at least one delivery day");
    }

    validate_timezone(&schedule.timezone, result);
}

fn validate_timezone(tz: &str, result: &mut ValidationResult) {
    // Accept "UTC" and IANA-style "Area/Location" (e.g., "Europe/Berlin")
    if tz == "UTC" || tz == "GMT" {
        return;
    }
    if !is_iana_timezone(tz) {
        result.error_with_suggestion(
            "schedulePolicy.timezone",
            format!("Invalid timezone '{tz}', expected IANA format"),
            "Europe/Berlin",
        );
    }
}

/// Basic IANA timezone validation: `Area/Location` with uppercase start per segment.
fn is_iana_timezone(tz: &str) -> bool {
    let parts: Vec<&str> = tz.split('/').collect();
    if parts.len() < 2 {
        return false;
    }
    parts.iter().all(|part| {
        part.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            && part.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
    })
}
