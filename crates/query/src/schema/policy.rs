//! Notification, selection, schedule and anomaly policies of a signal.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// When a signal delivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPolicy {
    #[default]
    Immediate,
    Scheduled,
    Digest,
}

impl NotificationPolicy {
    pub fn requires_schedule(self) -> bool {
        !matches!(self, NotificationPolicy::Immediate)
    }
}

/// How matched content is curated for delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionPolicy {
    #[default]
    AllMatches,
    #[serde(rename_all = "camelCase")]
    AiSummary {
        #[serde(default)]
        newsletter_format: NewsletterFormat,
    },
    #[serde(rename_all = "camelCase")]
    TopN { max_items: u32 },
}

impl SelectionPolicy {
    /// Top-N ranks matches by volume, so it needs an anomaly volume field.
    pub fn requires_volume_data(&self) -> bool {
        matches!(self, SelectionPolicy::TopN { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsletterFormat {
    #[default]
    Brief,
    Detailed,
    Bullets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        };
        write!(f, "{name}")
    }
}

/// Delivery days and time for scheduled and digest signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePolicy {
    #[serde(default)]
    pub days: BTreeSet<Weekday>,
    pub time: NaiveTime,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl SchedulePolicy {
    pub fn new(days: impl IntoIterator<Item = Weekday>, time: NaiveTime) -> Self {
        Self {
            days: days.into_iter().collect(),
            time,
            timezone: default_timezone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.days.is_empty()
    }
}

/// Volume threshold for anomaly-driven selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyConfig {
    pub volume_field: String,
    pub threshold: f64,
}

impl AnomalyConfig {
    pub fn is_valid(&self) -> bool {
        !self.volume_field.trim().is_empty() && self.threshold.is_finite() && self.threshold > 0.0
    }
}

/// What content the query runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchScope {
    /// All content.
    #[default]
    All,
    /// A specific workflow template.
    #[serde(rename_all = "camelCase")]
    Template { template_id: String },
}
