//! Submission adapter.
//!
//! Maps a finished draft onto the explicit payload the backend accepts.
//! Only listed fields are carried over; draft-only helpers such as the
//! `selected_patient` display object are dropped. The author id is always
//! passed in by the caller.

use clinica_core::draft::{is_blank, numeric_value};
use clinica_core::models::medical_history::MedicalHistoryPayload;
use clinica_core::models::patient::{EmergencyContact, Gender, Insurance, PatientPayload};
use clinica_core::models::specialty::{
    FeedingType, GynecoObstetricHistory, PediatricHistory, VaccinationRecord,
};
use clinica_core::models::vital_signs::VitalSigns;
use clinica_core::{Draft, EntityKind, RecordType};
use jiff::civil::Date;
use serde_json::Value;

use crate::error::AdapterError;

/// Build the JSON payload for `kind` from `draft`.
pub fn build_payload(kind: EntityKind, draft: &Draft, author_id: &str) -> Result<Value, AdapterError> {
    let payload = match kind {
        EntityKind::MedicalHistory => serde_json::to_value(medical_history_payload(draft, author_id)?)?,
        EntityKind::Patient => serde_json::to_value(patient_payload(draft, author_id)?)?,
    };
    Ok(payload)
}

pub fn medical_history_payload(
    draft: &Draft,
    author_id: &str,
) -> Result<MedicalHistoryPayload, AdapterError> {
    let patient_id = identifier(draft, "patient_id")
        .or_else(|| identifier(draft, "selected_patient.id"))
        .ok_or_else(|| AdapterError::MissingField("patient_id".to_string()))?;

    let record_type: RecordType = required_str(draft, "type")?
        .parse()
        .map_err(|e: clinica_core::error::CoreError| AdapterError::invalid("type", e.to_string()))?;

    let gyneco_obstetric = match record_type {
        RecordType::GynecoObstetric => Some(gyneco_obstetric(draft)?),
        _ => None,
    };
    let pediatric = match record_type {
        RecordType::Pediatrics => Some(pediatric(draft)?),
        _ => None,
    };

    Ok(MedicalHistoryPayload {
        patient_id,
        record_type,
        visit_date: required_date(draft, "visit_date")?,
        doctor_id: identifier(draft, "doctor_id"),
        chief_complaint: required_str(draft, "chief_complaint")?,
        vital_signs: vital_signs(draft)?,
        allergies: string_list(draft, "allergies"),
        current_medications: string_list(draft, "current_medications"),
        chronic_conditions: string_list(draft, "chronic_conditions"),
        surgical_history: optional_str(draft, "surgical_history"),
        family_history: optional_str(draft, "family_history"),
        diagnosis: required_str(draft, "diagnosis")?,
        treatment_plan: optional_str(draft, "treatment_plan"),
        follow_up_date: optional_date(draft, "follow_up_date")?,
        notes: optional_str(draft, "notes"),
        gyneco_obstetric,
        pediatric,
        author_id: author_id.to_string(),
    })
}

pub fn patient_payload(draft: &Draft, author_id: &str) -> Result<PatientPayload, AdapterError> {
    let gender = required_str(draft, "gender")?;
    let gender = Gender::parse(&gender)
        .ok_or_else(|| AdapterError::invalid("gender", format!("unknown gender '{gender}'")))?;

    let emergency_contact = EmergencyContact {
        name: optional_str(draft, "emergency_contact.name"),
        relationship: optional_str(draft, "emergency_contact.relationship"),
        phone: optional_str(draft, "emergency_contact.phone"),
    };
    let has_emergency_contact = emergency_contact.name.is_some()
        || emergency_contact.relationship.is_some()
        || emergency_contact.phone.is_some();

    let insurance = if draft.get_bool("has_insurance").unwrap_or(false) {
        Some(Insurance {
            provider: required_str(draft, "insurance.provider")?,
            policy_number: required_str(draft, "insurance.policy_number")?,
            valid_until: optional_date(draft, "insurance.valid_until")?,
        })
    } else {
        None
    };

    Ok(PatientPayload {
        first_name: required_str(draft, "first_name")?,
        last_name: required_str(draft, "last_name")?,
        date_of_birth: required_date(draft, "date_of_birth")?,
        gender,
        national_id: optional_str(draft, "national_id"),
        phone: required_str(draft, "phone")?,
        email: optional_str(draft, "email"),
        address: optional_str(draft, "address"),
        emergency_contact: has_emergency_contact.then_some(emergency_contact),
        insurance,
        author_id: author_id.to_string(),
    })
}

fn vital_signs(draft: &Draft) -> Result<VitalSigns, AdapterError> {
    Ok(VitalSigns {
        blood_pressure_systolic: optional_number(draft, "vital_signs.blood_pressure_systolic")?,
        blood_pressure_diastolic: optional_number(draft, "vital_signs.blood_pressure_diastolic")?,
        heart_rate: optional_int(draft, "vital_signs.heart_rate")?,
        respiratory_rate: optional_int(draft, "vital_signs.respiratory_rate")?,
        temperature: optional_number(draft, "vital_signs.temperature")?,
        oxygen_saturation: optional_number(draft, "vital_signs.oxygen_saturation")?,
        weight: optional_number(draft, "vital_signs.weight")?,
        height: optional_number(draft, "vital_signs.height")?,
    })
}

fn gyneco_obstetric(draft: &Draft) -> Result<GynecoObstetricHistory, AdapterError> {
    Ok(GynecoObstetricHistory {
        last_menstrual_period: optional_date(draft, "gyneco_obstetric.last_menstrual_period")?,
        gravida: optional_int(draft, "gyneco_obstetric.gravida")?,
        para: optional_int(draft, "gyneco_obstetric.para")?,
        abortions: optional_int(draft, "gyneco_obstetric.abortions")?,
        cesareans: optional_int(draft, "gyneco_obstetric.cesareans")?,
        contraceptive_method: optional_str(draft, "gyneco_obstetric.contraceptive_method"),
    })
}

fn pediatric(draft: &Draft) -> Result<PediatricHistory, AdapterError> {
    let feeding_type = match optional_str(draft, "pediatric.feeding_type") {
        Some(s) => Some(FeedingType::parse(&s).ok_or_else(|| {
            AdapterError::invalid("pediatric.feeding_type", format!("unknown feeding type '{s}'"))
        })?),
        None => None,
    };

    let mut vaccinations = Vec::new();
    if let Some(entries) = draft.get_path("pediatric.vaccinations").and_then(Value::as_array) {
        for (i, entry) in entries.iter().enumerate() {
            let path = format!("pediatric.vaccinations.{i}");
            let vaccine = entry_str(entry, "vaccine")
                .ok_or_else(|| AdapterError::MissingField(format!("{path}.vaccine")))?;
            let date = entry_str(entry, "date")
                .ok_or_else(|| AdapterError::MissingField(format!("{path}.date")))?;
            vaccinations.push(VaccinationRecord {
                vaccine,
                date: parse_date(&format!("{path}.date"), &date)?,
                dose: entry_str(entry, "dose"),
            });
        }
    }

    Ok(PediatricHistory {
        birth_weight: optional_number(draft, "pediatric.birth_weight")?,
        gestational_age_weeks: optional_int(draft, "pediatric.gestational_age_weeks")?,
        apgar_score: optional_int(draft, "pediatric.apgar_score")?,
        feeding_type,
        vaccinations,
    })
}

fn entry_str(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An identifier may arrive as a string or a number depending on the
/// picker that produced it.
fn identifier(draft: &Draft, path: &str) -> Option<String> {
    match draft.get_path(path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_str(draft: &Draft, path: &str) -> Result<String, AdapterError> {
    optional_str(draft, path).ok_or_else(|| AdapterError::MissingField(path.to_string()))
}

fn optional_str(draft: &Draft, path: &str) -> Option<String> {
    draft.get_str(path).map(str::to_string)
}

fn parse_date(path: &str, s: &str) -> Result<Date, AdapterError> {
    s.parse::<Date>()
        .map_err(|e| AdapterError::invalid(path, e.to_string()))
}

fn required_date(draft: &Draft, path: &str) -> Result<Date, AdapterError> {
    parse_date(path, &required_str(draft, path)?)
}

fn optional_date(draft: &Draft, path: &str) -> Result<Option<Date>, AdapterError> {
    draft.get_str(path).map(|s| parse_date(path, s)).transpose()
}

fn optional_number(draft: &Draft, path: &str) -> Result<Option<f64>, AdapterError> {
    match draft.get_path(path) {
        None => Ok(None),
        Some(value) if is_blank(value) => Ok(None),
        Some(value) => numeric_value(value)
            .map(Some)
            .ok_or_else(|| AdapterError::invalid(path, "not a number")),
    }
}

fn optional_int<T: TryFrom<i64>>(draft: &Draft, path: &str) -> Result<Option<T>, AdapterError> {
    let Some(n) = optional_number(draft, path)? else {
        return Ok(None);
    };
    if n.fract() != 0.0 {
        return Err(AdapterError::invalid(path, "not a whole number"));
    }
    T::try_from(n as i64)
        .map(Some)
        .map_err(|_| AdapterError::invalid(path, "out of range"))
}

fn string_list(draft: &Draft, path: &str) -> Vec<String> {
    draft
        .get_path(path)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
