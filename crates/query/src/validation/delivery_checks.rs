//! Selection policy and delivery method validation.

use crate::schema::*;

use super::ValidationResult;

pub(super) fn validate_selection(payload: &SignalPayload, result: &mut ValidationResult) {
    if let SelectionPolicy::TopN { max_items } = payload.selection_policy {
        if max_items == 0 {
            result.error("selectionPolicy.maxItems", "Top-N selection needs at least one item");
        }
    }

    match &payload.anomaly {
        None if payload.selection_policy.requires_volume_data() => {
            result.error("anomaly", "This selection policy needs a volume field and threshold");
        }
        None => {}
        Some(anomaly) => {
            if !payload.selection_policy.requires_volume_data() {
                result.warn("anomaly", "Anomaly settings are unused by this selection policy");
            }
            if anomaly.volume_field.trim().is_empty() {
                result.error("anomaly.volumeField", "Volume field must not be empty");
            }
            if !(anomaly.threshold.is_finite() && anomaly.threshold > 0.0) {
                result.error(
                    "anomaly.threshold",
                    format!("Threshold must be a positive number, got {}", anomaly.threshold),
                );
            }
        }
    }
}

pub(super) fn validate_delivery(payload: &SignalPayload, result: &mut ValidationResult) {
    for (i, method) in payload.delivery_methods.iter().enumerate() {
        if !method.is_configured() {
            result.error(
                format!("deliveryMethods[{i}].configId"),
                format!("{:?} delivery needs a destination", method.kind),
            );
        }
    }
}
