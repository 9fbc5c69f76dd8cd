use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual appearance of the pond water as reported by the operator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDescriptor {
    #[default]
    #[serde(alias = "Clear")]
    Clear,
    #[serde(alias = "Light Green", alias = "light-green")]
    LightGreen,
    #[serde(alias = "Dark Green", alias = "dark-green")]
    DarkGreen,
    #[serde(alias = "Brown")]
    Brown,
    #[serde(alias = "Murky")]
    Murky,
}

impl ColorDescriptor {
    pub const ALL: [ColorDescriptor; 5] = [
        ColorDescriptor::Clear,
        ColorDescriptor::LightGreen,
        ColorDescriptor::DarkGreen,
        ColorDescriptor::Brown,
        ColorDescriptor::Murky,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ColorDescriptor::Clear => "Clear",
            ColorDescriptor::LightGreen => "Light Green",
            ColorDescriptor::DarkGreen => "Dark Green",
            ColorDescriptor::Brown => "Brown",
            ColorDescriptor::Murky => "Murky",
        }
    }
}

impl fmt::Display for ColorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ColorDescriptor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        ColorDescriptor::ALL
            .into_iter()
            .find(|c| normalize(c.label()) == key)
            .ok_or_else(|| {
                format!(
                    "unknown water color '{}' (expected one of: {})",
                    s,
                    join_labels(ColorDescriptor::ALL.iter().map(|c| c.label()))
                )
            })
    }
}

/// Odour of the pond water as reported by the operator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmellDescriptor {
    #[default]
    #[serde(alias = "Fresh")]
    Fresh,
    #[serde(alias = "Earthy")]
    Earthy,
    #[serde(alias = "Fishy")]
    Fishy,
    #[serde(alias = "Rotten")]
    Rotten,
}

impl SmellDescriptor {
    pub const ALL: [SmellDescriptor; 4] = [
        SmellDescriptor::Fresh,
        SmellDescriptor::Earthy,
        SmellDescriptor::Fishy,
        SmellDescriptor::Rotten,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SmellDescriptor::Fresh => "Fresh",
            SmellDescriptor::Earthy => "Earthy",
            SmellDescriptor::Fishy => "Fishy",
            SmellDescriptor::Rotten => "Rotten",
        }
    }
}

impl fmt::Display for SmellDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SmellDescriptor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        SmellDescriptor::ALL
            .into_iter()
            .find(|c| normalize(c.label()) == key)
            .ok_or_else(|| {
                format!(
                    "unknown water smell '{}' (expected one of: {})",
                    s,
                    join_labels(SmellDescriptor::ALL.iter().map(|c| c.label()))
                )
            })
    }
}

/// A single operator-supplied reading. Never stored; lives for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub ph: f64,
    #[serde(default)]
    pub color: ColorDescriptor,
    #[serde(default)]
    pub smell: SmellDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaterQualityStatus {
    Good,
    Moderate,
    Critical,
}

impl fmt::Display for WaterQualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WaterQualityStatus::Good => "GOOD",
            WaterQualityStatus::Moderate => "MODERATE",
            WaterQualityStatus::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterQualityVerdict {
    pub status: WaterQualityStatus,
    pub recommendations: Vec<String>,
}

// Case, spaces, dashes and underscores are not significant in descriptor names.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_display_and_cli_spellings() {
        assert_eq!("Light Green".parse::<ColorDescriptor>(), Ok(ColorDescriptor::LightGreen));
        assert_eq!("light-green".parse::<ColorDescriptor>(), Ok(ColorDescriptor::LightGreen));
        assert_eq!("DARK_GREEN".parse::<ColorDescriptor>(), Ok(ColorDescriptor::DarkGreen));
        assert_eq!("murky".parse::<ColorDescriptor>(), Ok(ColorDescriptor::Murky));
    }

    #[test]
    fn unknown_descriptor_lists_the_choices() {
        let err = "purple".parse::<ColorDescriptor>().unwrap_err();
        assert!(err.contains("purple"));
        assert!(err.contains("Light Green"));

        let err = "sweet".parse::<SmellDescriptor>().unwrap_err();
        assert!(err.contains("Rotten"));
    }

    #[test]
    fn sample_accepts_display_labels_in_json() {
        let sample: WaterSample =
            serde_json::from_str(r#"{"ph": 7.2, "color": "Light Green", "smell": "fishy"}"#).unwrap();
        assert_eq!(sample.color, ColorDescriptor::LightGreen);
        assert_eq!(sample.smell, SmellDescriptor::Fishy);
    }

    #[test]
    fn status_serializes_in_upper_case() {
        let json = serde_json::to_string(&WaterQualityStatus::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        assert_eq!(WaterQualityStatus::Moderate.to_string(), "MODERATE");
    }
}
