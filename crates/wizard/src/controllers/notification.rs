use chrono::NaiveTime;
use signal_query::schema::{NotificationPolicy, SchedulePolicy, Weekday};

use super::{CommitError, StepContext, StepController};
use crate::steps::WizardStep;
use crate::store::SignalDraft;

/// Schedule started by picking a day or timezone before a time.
fn empty_schedule() -> SchedulePolicy {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
    SchedulePolicy::new(Vec::<Weekday>::new(), nine)
}

pub struct NotificationStep<'a> {
    ctx: StepContext<'a>,
}

impl<'a> NotificationStep<'a> {
    pub(crate) fn new(ctx: StepContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn policy(&self) -> NotificationPolicy {
        self.ctx.draft().notification_policy
    }

    pub fn schedule(&self) -> Option<&SchedulePolicy> {
        self.ctx.draft().schedule_policy.as_ref()
    }

    pub fn set_policy(&mut self, policy: NotificationPolicy) {
        self.ctx.patch(|d| d.notification_policy = policy);
    }

    pub fn set_schedule(&mut self, schedule: Option<SchedulePolicy>) {
        self.ctx.patch(|d| d.schedule_policy = schedule);
    }

    /// Add or remove a delivery day.
    pub fn toggle_day(&mut self, day: Weekday) {
        self.ctx.patch(|d| {
            let schedule = d
                .schedule_policy
                .get_or_insert_with(empty_schedule);
            if !schedule.days.remove(&day) {
                schedule.days.insert(day);
            }
        });
    }

    pub fn set_time(&mut self, time: NaiveTime) {
        self.ctx.patch(|d| match &mut d.schedule_policy {
            Some(schedule) => schedule.time = time,
            None => d.schedule_policy = Some(SchedulePolicy::new(Vec::<Weekday>::new(), time)),
        });
    }

    pub fn set_timezone(&mut self, timezone: impl Into<String>) {
        let timezone = timezone.into();
        self.ctx.patch(|d| {
            d.schedule_policy
                .get_or_insert_with(empty_schedule)
                .timezone = timezone;
        });
    }
}

impl StepController for NotificationStep<'_> {
    fn step(&self) -> WizardStep {
        WizardStep::NotificationPolicy
    }

    fn draft(&self) -> &SignalDraft {
        self.ctx.draft()
    }

    fn commit(&mut self) -> Result<WizardStep, CommitError> {
        self.ctx.commit(WizardStep::NotificationPolicy, |d| {
            if !d.notification_policy.requires_schedule() {
                d.schedule_policy = None;
            }
        })
    }
}
