//! pH-based water quality assessment.
//!
//! The colour and smell descriptors on a [`WaterSample`] are carried through to
//! the rendered report but do not take part in the decision, and the advisory
//! list is the same for every status.

use aquaforge_schemas::water::{WaterQualityStatus, WaterQualityVerdict, WaterSample};
use tracing::debug;

pub const GOOD_PH_MIN: f64 = 6.5;
pub const GOOD_PH_MAX: f64 = 9.0;
pub const MODERATE_PH_MIN: f64 = 5.5;
pub const MODERATE_PH_MAX: f64 = 10.0;

/// Lowest and highest pH the input surfaces accept.
pub const PH_SCALE: (f64, f64) = (0.0, 14.0);

pub const RECOMMENDATIONS: [&str; 4] = [
    "Maintain proper aeration",
    "Monitor ammonia & nitrite",
    "Control feeding",
    "Perform partial water exchange",
];

/// Maps a pH reading to a status.
///
/// Total over `f64`: anything outside the Good and Moderate bands, including
/// values off the 0-14 scale and NaN, is Critical.
pub fn classify_ph(ph: f64) -> WaterQualityStatus {
    if (GOOD_PH_MIN..=GOOD_PH_MAX).contains(&ph) {
        WaterQualityStatus::Good
    } else if (MODERATE_PH_MIN..GOOD_PH_MIN).contains(&ph)
        || (ph > GOOD_PH_MAX && ph <= MODERATE_PH_MAX)
    {
        WaterQualityStatus::Moderate
    } else {
        WaterQualityStatus::Critical
    }
}

pub fn assess(sample: &WaterSample) -> WaterQualityVerdict {
    let status = classify_ph(sample.ph);
    debug!(ph = sample.ph, color = %sample.color, smell = %sample.smell, %status, "water sample assessed");
    WaterQualityVerdict {
        status,
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
    }
}

/// Clamps a reading onto the pH scale. Returns the clamped value and whether it moved.
pub fn clamp_to_scale(ph: f64) -> (f64, bool) {
    let clamped = ph.clamp(PH_SCALE.0, PH_SCALE.1);
    (clamped, clamped != ph && !ph.is_nan())
}
