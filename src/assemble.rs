use std::cmp::Ordering;

use crate::detect::Detection;

/// Orders per-character detections left to right and joins their labels.
///
/// Detections at or below `min_confidence` are dropped (the threshold is
/// strict). `None` means nothing survived the filter, which is distinct
/// from an empty string. The sort is stable: two boxes sharing the same
/// left edge keep their input order. Overlapping or duplicate character
/// boxes are not resolved geometrically; every surviving label is kept,
/// matching the model post-processing this was built against.
pub fn assemble(detections: &[Detection], min_confidence: f32) -> Option<String> {
    let mut chars: Vec<&Detection> = detections
        .iter()
        .filter(|d| d.confidence > min_confidence)
        .collect();

    if chars.is_empty() {
        return None;
    }

    chars.sort_by(|a, b| a.x1.partial_cmp(&b.x1).unwrap_or(Ordering::Equal));

    Some(chars.iter().map(|d| d.label.as_str()).collect())
}

/// Mean confidence of the detections that survive the same strict filter
/// `assemble` applies. `None` when nothing survives.
pub fn mean_confidence(detections: &[Detection], min_confidence: f32) -> Option<f32> {
    let survivors: Vec<f32> = detections
        .iter()
        .filter(|d| d.confidence > min_confidence)
        .map(|d| d.confidence)
        .collect();

    if survivors.is_empty() {
        return None;
    }

    Some(survivors.iter().sum::<f32>() / survivors.len() as f32)
}
