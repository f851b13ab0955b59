//! Body measurements recorded against items (centimetres).

use serde::{Deserialize, Serialize};

/// A body measurement that can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Bust,
    Waist,
    Hip,
    Length,
}

impl MeasurementField {
    /// Every filterable measurement, in display order.
    pub const ALL: [Self; 4] = [Self::Bust, Self::Waist, Self::Hip, Self::Length];

    /// Short key used in parameter names (`measurement_<key>_min`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bust => "bust",
            Self::Waist => "waist",
            Self::Hip => "hip",
            Self::Length => "length",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bust => "Bust",
            Self::Waist => "Waist",
            Self::Hip => "Hip",
            Self::Length => "Length",
        }
    }

    /// Query parameter carrying the lower bound.
    #[must_use]
    pub const fn min_param(self) -> &'static str {
        match self {
            Self::Bust => "measurement_bust_min",
            Self::Waist => "measurement_waist_min",
            Self::Hip => "measurement_hip_min",
            Self::Length => "measurement_length_min",
        }
    }

    /// Query parameter carrying the upper bound.
    #[must_use]
    pub const fn max_param(self) -> &'static str {
        match self {
            Self::Bust => "measurement_bust_max",
            Self::Waist => "measurement_waist_max",
            Self::Hip => "measurement_hip_max",
            Self::Length => "measurement_length_max",
        }
    }
}

impl std::fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measurement record. Items may carry several (one per variant/size).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    pub bust_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub length_cm: Option<f64>,
}

impl Measurement {
    /// Value recorded for `field`, if any.
    #[must_use]
    pub const fn get(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Bust => self.bust_cm,
            MeasurementField::Waist => self.waist_cm,
            MeasurementField::Hip => self.hip_cm,
            MeasurementField::Length => self.length_cm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_names() {
        assert_eq!(MeasurementField::Bust.min_param(), "measurement_bust_min");
        assert_eq!(MeasurementField::Length.max_param(), "measurement_length_max");
        for field in MeasurementField::ALL {
            assert!(field.min_param().contains(field.as_str()));
            assert!(field.max_param().contains(field.as_str()));
        }
    }

    #[test]
    fn test_get_reads_matching_column() {
        let m = Measurement {
            bust_cm: Some(84.0),
            waist_cm: None,
            hip_cm: Some(90.5),
            length_cm: None,
        };
        assert_eq!(m.get(MeasurementField::Bust), Some(84.0));
        assert_eq!(m.get(MeasurementField::Waist), None);
        assert_eq!(m.get(MeasurementField::Hip), Some(90.5));
    }
}
