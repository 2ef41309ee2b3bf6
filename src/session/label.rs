use serde::{Deserialize, Serialize};

/// Storm organisation categories offered to the reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StormLabel {
    #[serde(rename = "Large Linear System")]
    LargeLinearSystem,
    #[serde(rename = "Large Circular")]
    LargeCircular,
    #[serde(rename = "Smaller-scale Circular")]
    SmallerScaleCircular,
    #[serde(rename = "Smaller-scale Linear")]
    SmallerScaleLinear,
    #[serde(rename = "No Organisation")]
    NoOrganisation,
    #[serde(rename = "None of the Above")]
    NoneOfTheAbove,
}

impl StormLabel {
    /// All labels, in the order they are offered
    pub const ALL: [StormLabel; 6] = [
        StormLabel::LargeLinearSystem,
        StormLabel::LargeCircular,
        StormLabel::SmallerScaleCircular,
        StormLabel::SmallerScaleLinear,
        StormLabel::NoOrganisation,
        StormLabel::NoneOfTheAbove,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StormLabel::LargeLinearSystem => "Large Linear System",
            StormLabel::LargeCircular => "Large Circular",
            StormLabel::SmallerScaleCircular => "Smaller-scale Circular",
            StormLabel::SmallerScaleLinear => "Smaller-scale Linear",
            StormLabel::NoOrganisation => "No Organisation",
            StormLabel::NoneOfTheAbove => "None of the Above",
        }
    }

    /// 0-based position in `ALL`
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|l| l == self).unwrap_or(0)
    }
}

impl std::fmt::Display for StormLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_strings_and_lookup() {
        assert_eq!(StormLabel::ALL.len(), 6);
        for (i, label) in StormLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(label.to_string(), label.label());
        }
        assert_eq!(StormLabel::LargeLinearSystem.label(), "Large Linear System");
        assert_eq!(StormLabel::NoneOfTheAbove.label(), "None of the Above");
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let json = serde_json::to_string(&StormLabel::SmallerScaleCircular).unwrap();
        assert_eq!(json, "\"Smaller-scale Circular\"");
        let back: StormLabel = serde_json::from_str("\"No Organisation\"").unwrap();
        assert_eq!(back, StormLabel::NoOrganisation);
    }
}
