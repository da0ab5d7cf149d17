//! Camera preference heuristic.
//!
//! Phones expose several cameras; product codes are scanned with the one on
//! the back. Selection is a pure function of the enumerated devices so it can
//! be tested without touching hardware.

use crate::core::types::DeviceDescriptor;

/// Label fragments that identify a rear-facing camera.
const REAR_FACING_HINTS: [&str; 3] = ["back", "rear", "environment"];

/// Returns `true` if `label` looks like a rear-facing camera.
///
/// Matching is a case-insensitive substring test.
pub fn is_rear_facing(label: &str) -> bool {
    let label = label.to_lowercase();
    REAR_FACING_HINTS.iter().any(|hint| label.contains(hint))
}

/// Picks the preferred camera from `devices`.
///
/// Returns the first video input whose label looks rear-facing, or `None`
/// to let the platform choose its default camera.
pub fn select_preferred_device(devices: &[DeviceDescriptor]) -> Option<&DeviceDescriptor> {
    devices
        .iter()
        .filter(|device| device.is_video_input())
        .find(|device| is_rear_facing(&device.label))
}
