//! Specialized sub-records attached to a medical history depending on its
//! record type.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GynecoObstetricHistory {
    #[ts(type = "string | null")]
    pub last_menstrual_period: Option<jiff::civil::Date>,
    pub gravida: Option<u8>,
    pub para: Option<u8>,
    pub abortions: Option<u8>,
    pub cesareans: Option<u8>,
    pub contraceptive_method: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FeedingType {
    Breast,
    Formula,
    Mixed,
    Solid,
}

impl FeedingType {
    pub const ALL: [FeedingType; 4] = [
        FeedingType::Breast,
        FeedingType::Formula,
        FeedingType::Mixed,
        FeedingType::Solid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedingType::Breast => "breast",
            FeedingType::Formula => "formula",
            FeedingType::Mixed => "mixed",
            FeedingType::Solid => "solid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VaccinationRecord {
    pub vaccine: String,
    #[ts(type = "string")]
    pub date: jiff::civil::Date,
    pub dose: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PediatricHistory {
    /// Kilograms.
    pub birth_weight: Option<f64>,
    pub gestational_age_weeks: Option<u8>,
    pub apgar_score: Option<u8>,
    pub feeding_type: Option<FeedingType>,
    pub vaccinations: Vec<VaccinationRecord>,
}
