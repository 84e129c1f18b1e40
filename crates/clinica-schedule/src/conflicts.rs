use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ScheduleError;
use crate::grid::active_for;
use crate::models::{Appointment, DayOfWeek, DoctorSchedule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum Conflict {
    /// Two active appointments share time. `first` starts no later than
    /// `second`.
    Overlap { first: String, second: String },
    /// An active appointment not fully inside one working-hour block.
    OutsideHours { appointment_id: String },
}

/// Every problem in a doctor's book. Overlaps come first, by start time of
/// the earlier appointment; then appointments outside working hours, by
/// start time. Cancelled appointments and other doctors' appointments are
/// ignored.
pub fn find_conflicts(
    schedule: &DoctorSchedule,
    appointments: &[Appointment],
) -> Result<Vec<Conflict>, ScheduleError> {
    schedule.validate()?;
    let active = active_for(schedule, appointments)?;
    let mut conflicts = Vec::new();

    for (i, first) in active.iter().enumerate() {
        for second in &active[i + 1..] {
            if first.overlaps(second.start, second.end()) {
                conflicts.push(Conflict::Overlap {
                    first: first.id.clone(),
                    second: second.id.clone(),
                });
            }
        }
    }

    for appointment in &active {
        if !within_hours(schedule, appointment) {
            conflicts.push(Conflict::OutsideHours {
                appointment_id: appointment.id.clone(),
            });
        }
    }

    Ok(conflicts)
}

fn within_hours(schedule: &DoctorSchedule, appointment: &Appointment) -> bool {
    let end = appointment.end();
    if end.date() != appointment.start.date() {
        return false;
    }
    let day = DayOfWeek::of(appointment.start.date());
    schedule
        .hours_on(day)
        .iter()
        .any(|block| block.contains(appointment.start.time(), end.time()))
}
