use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The kind of record a wizard creates or updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EntityKind {
    MedicalHistory,
    Patient,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::MedicalHistory => "medical_history",
            EntityKind::Patient => "patient",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medical_history" => Ok(EntityKind::MedicalHistory),
            "patient" => Ok(EntityKind::Patient),
            other => Err(CoreError::UnknownEntityKind(other.to_string())),
        }
    }
}

/// Medical history record type. Drives which specialized step is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RecordType {
    General,
    GynecoObstetric,
    Pediatrics,
}

impl RecordType {
    pub const ALL: [RecordType; 3] = [
        RecordType::General,
        RecordType::GynecoObstetric,
        RecordType::Pediatrics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::General => "general",
            RecordType::GynecoObstetric => "gyneco_obstetric",
            RecordType::Pediatrics => "pediatrics",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRecordType(s.to_string()))
    }
}
