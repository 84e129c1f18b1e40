use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Vital signs captured at the visit. Every measurement is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VitalSigns {
    /// mmHg
    pub blood_pressure_systolic: Option<f64>,
    /// mmHg
    pub blood_pressure_diastolic: Option<f64>,
    /// Beats per minute.
    pub heart_rate: Option<u16>,
    /// Breaths per minute.
    pub respiratory_rate: Option<u16>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Percent SpO2.
    pub oxygen_saturation: Option<f64>,
    /// Kilograms.
    pub weight: Option<f64>,
    /// Centimetres.
    pub height: Option<f64>,
}

impl VitalSigns {
    pub fn is_empty(&self) -> bool {
        *self == VitalSigns::default()
    }

    /// Body-mass index, when both weight and height are recorded.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight?;
        let height_m = self.height? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some(weight / (height_m * height_m))
    }
}
