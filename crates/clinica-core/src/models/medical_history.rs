use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::specialty::{GynecoObstetricHistory, PediatricHistory};
use super::vital_signs::VitalSigns;
use crate::entity::RecordType;

/// Body of a medical history create/update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicalHistoryPayload {
    pub patient_id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[ts(type = "string")]
    pub visit_date: jiff::civil::Date,
    pub doctor_id: Option<String>,
    pub chief_complaint: String,
    pub vital_signs: VitalSigns,
    pub allergies: Vec<String>,
    pub current_medications: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub surgical_history: Option<String>,
    pub family_history: Option<String>,
    pub diagnosis: String,
    pub treatment_plan: Option<String>,
    #[ts(type = "string | null")]
    pub follow_up_date: Option<jiff::civil::Date>,
    pub notes: Option<String>,
    /// Present only for `gyneco_obstetric` records.
    pub gyneco_obstetric: Option<GynecoObstetricHistory>,
    /// Present only for `pediatrics` records.
    pub pediatric: Option<PediatricHistory>,
    /// Id of the authenticated user submitting the record.
    pub author_id: String,
}
