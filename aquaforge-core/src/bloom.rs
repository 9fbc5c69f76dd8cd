use aquaforge_schemas::bloom::{BloomSeverity, BloomSeverityVerdict};

pub const MODERATE_MIN_REGIONS: usize = 2;
pub const SEVERE_MIN_REGIONS: usize = 5;

pub const NORMAL_CONDITION: &str = "Water condition appears normal.";

pub const IMMEDIATE_ACTIONS: [&str; 4] = [
    "Increase aeration immediately",
    "Reduce feeding",
    "Partial water exchange",
    "Monitor dissolved oxygen",
];

pub fn classify_count(region_count: usize) -> BloomSeverity {
    match region_count {
        0 => BloomSeverity::None,
        n if n >= SEVERE_MIN_REGIONS => BloomSeverity::Severe,
        n if n >= MODERATE_MIN_REGIONS => BloomSeverity::Moderate,
        _ => BloomSeverity::Mild,
    }
}

/// Builds the verdict for a number of detected bloom regions.
pub fn assess(region_count: usize) -> BloomSeverityVerdict {
    let severity = classify_count(region_count);
    let guidance = if severity.is_bloom() {
        IMMEDIATE_ACTIONS.iter().map(|a| a.to_string()).collect()
    } else {
        vec![NORMAL_CONDITION.to_string()]
    };
    BloomSeverityVerdict { region_count, severity, guidance }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counts_map_to_severity() {
        assert_eq!(classify_count(0), BloomSeverity::None);
        assert_eq!(classify_count(1), BloomSeverity::Mild);
        assert_eq!(classify_count(2), BloomSeverity::Moderate);
        assert_eq!(classify_count(4), BloomSeverity::Moderate);
        assert_eq!(classify_count(5), BloomSeverity::Severe);
        assert_eq!(classify_count(100), BloomSeverity::Severe);
    }

    #[test]
    fn no_regions_reports_normal_condition() {
        let verdict = assess(0);
        assert_eq!(verdict.severity, BloomSeverity::None);
        assert_eq!(verdict.guidance, vec![NORMAL_CONDITION.to_string()]);
    }

    #[test]
    fn three_regions_is_moderate_with_immediate_actions() {
        let verdict = assess(3);
        assert_eq!(verdict.severity, BloomSeverity::Moderate);
        assert_eq!(verdict.region_count, 3);
        assert_eq!(verdict.guidance.len(), 4);
        assert_eq!(verdict.guidance[0], "Increase aeration immediately");
    }

    proptest! {
        #[test]
        fn any_detection_gets_the_same_actions(count in 1usize..10_000) {
            let verdict = assess(count);
            prop_assert!(verdict.severity.is_bloom());
            prop_assert_eq!(verdict.guidance.len(), IMMEDIATE_ACTIONS.len());
        }

        #[test]
        fn severity_never_decreases_with_count(count in 0usize..10_000) {
            prop_assert!(classify_count(count) <= classify_count(count + 1));
        }

        #[test]
        fn assessment_is_idempotent(count in any::<usize>()) {
            prop_assert_eq!(assess(count), assess(count));
        }
    }
}
