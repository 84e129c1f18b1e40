//! Slot lookup and grid assembly.

use std::collections::BTreeSet;

use jiff::ToSpan;
use jiff::civil::{Date, Time};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::ScheduleError;
use crate::models::{Appointment, DayOfWeek, DoctorSchedule, TimeSlot};

/// State of one slot on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export)]
pub enum GridCell {
    Free,
    Booked { appointment_id: String },
    /// Two or more active appointments overlap the slot.
    Conflict { appointment_ids: Vec<String> },
    /// The doctor does not work this slot on this day.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyRow {
    pub slot: TimeSlot,
    pub cell: GridCell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyGrid {
    pub doctor_id: String,
    #[ts(type = "string")]
    pub date: Date,
    pub day: DayOfWeek,
    pub rows: Vec<DailyRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklyRow {
    #[ts(type = "string")]
    pub start: Time,
    /// One cell per day of the week, in [`WeeklyGrid::days`] order.
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklyGrid {
    pub doctor_id: String,
    #[ts(type = "string[]")]
    pub days: Vec<Date>,
    pub rows: Vec<WeeklyRow>,
}

/// Slots for a weekday, ordered, built from every working-hour block of
/// that day. A trailing piece shorter than the slot length is dropped.
pub fn slots_for_day(schedule: &DoctorSchedule, day: DayOfWeek) -> Result<Vec<TimeSlot>, ScheduleError> {
    schedule.validate()?;

    let span = schedule.slot_span();
    let mut slots = Vec::new();
    for block in schedule.hours_on(day) {
        let mut start = block.start;
        // Time::checked_add fails instead of wrapping past midnight.
        while let Ok(end) = start.checked_add(span) {
            if end > block.end || end <= start {
                break;
            }
            slots.push(TimeSlot { start, end });
            start = end;
        }
    }
    Ok(slots)
}

pub fn daily_grid(
    schedule: &DoctorSchedule,
    date: Date,
    appointments: &[Appointment],
) -> Result<DailyGrid, ScheduleError> {
    let day = DayOfWeek::of(date);
    let active = active_for(schedule, appointments)?;
    let rows: Vec<DailyRow> = slots_for_day(schedule, day)?
        .into_iter()
        .map(|slot| DailyRow {
            slot,
            cell: cell_for(&active, date, slot),
        })
        .collect();

    debug!(doctor = %schedule.doctor_id, %date, slots = rows.len(), "built daily grid");
    Ok(DailyGrid {
        doctor_id: schedule.doctor_id.clone(),
        date,
        day,
        rows,
    })
}

/// Seven days starting at `week_start`. Rows are the union of slot start
/// times across the week.
pub fn weekly_grid(
    schedule: &DoctorSchedule,
    week_start: Date,
    appointments: &[Appointment],
) -> Result<WeeklyGrid, ScheduleError> {
    let days = (0..7i64)
        .map(|offset| week_start.checked_add(offset.days()))
        .collect::<Result<Vec<Date>, _>>()?;

    let mut per_day = Vec::with_capacity(days.len());
    for date in &days {
        per_day.push(slots_for_day(schedule, DayOfWeek::of(*date))?);
    }

    let starts: BTreeSet<Time> = per_day.iter().flatten().map(|slot| slot.start).collect();
    let active = active_for(schedule, appointments)?;

    let rows: Vec<WeeklyRow> = starts
        .into_iter()
        .map(|start| WeeklyRow {
            start,
            cells: days
                .iter()
                .zip(&per_day)
                .map(|(date, slots)| match slots.iter().find(|s| s.start == start) {
                    Some(slot) => cell_for(&active, *date, *slot),
                    None => GridCell::Unavailable,
                })
                .collect(),
        })
        .collect();

    debug!(doctor = %schedule.doctor_id, %week_start, rows = rows.len(), "built weekly grid");
    Ok(WeeklyGrid {
        doctor_id: schedule.doctor_id.clone(),
        days,
        rows,
    })
}

/// Active appointments of this doctor, ordered by start time then id.
/// An active appointment without a duration occupies no slot and is
/// rejected.
pub(crate) fn active_for<'a>(
    schedule: &DoctorSchedule,
    appointments: &'a [Appointment],
) -> Result<Vec<&'a Appointment>, ScheduleError> {
    let mut active: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.doctor_id == schedule.doctor_id && a.is_active())
        .collect();
    if let Some(empty) = active.iter().find(|a| a.duration_minutes == 0) {
        return Err(ScheduleError::ZeroDuration {
            appointment_id: empty.id.clone(),
        });
    }
    active.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    Ok(active)
}

fn cell_for(active: &[&Appointment], date: Date, slot: TimeSlot) -> GridCell {
    let (start, end) = slot.on(date);
    let mut ids: Vec<String> = active
        .iter()
        .filter(|a| a.overlaps(start, end))
        .map(|a| a.id.clone())
        .collect();

    match ids.len() {
        0 => GridCell::Free,
        1 => GridCell::Booked {
            appointment_id: ids.remove(0),
        },
        _ => GridCell::Conflict { appointment_ids: ids },
    }
}
