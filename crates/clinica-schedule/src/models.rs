use std::fmt;

use jiff::civil::{Date, DateTime, Time, Weekday};
use jiff::{Span, ToSpan};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ScheduleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Monday,
            DayOfWeek::Tuesday => Weekday::Tuesday,
            DayOfWeek::Wednesday => Weekday::Wednesday,
            DayOfWeek::Thursday => Weekday::Thursday,
            DayOfWeek::Friday => Weekday::Friday,
            DayOfWeek::Saturday => Weekday::Saturday,
            DayOfWeek::Sunday => Weekday::Sunday,
        }
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => DayOfWeek::Monday,
            Weekday::Tuesday => DayOfWeek::Tuesday,
            Weekday::Wednesday => DayOfWeek::Wednesday,
            Weekday::Thursday => DayOfWeek::Thursday,
            Weekday::Friday => DayOfWeek::Friday,
            Weekday::Saturday => DayOfWeek::Saturday,
            Weekday::Sunday => DayOfWeek::Sunday,
        }
    }

    pub fn of(date: Date) -> Self {
        Self::from_weekday(date.weekday())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block of working time on a weekday. A day may have several blocks
/// (e.g. a morning and an afternoon clinic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkingHours {
    pub day: DayOfWeek,
    #[ts(type = "string")]
    pub start: Time,
    #[ts(type = "string")]
    pub end: Time,
}

impl WorkingHours {
    pub fn contains(&self, start: Time, end: Time) -> bool {
        self.start <= start && end <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DoctorSchedule {
    pub doctor_id: String,
    pub doctor_name: String,
    pub slot_minutes: u16,
    pub hours: Vec<WorkingHours>,
}

impl DoctorSchedule {
    pub const MIN_SLOT_MINUTES: u16 = 5;
    pub const MAX_SLOT_MINUTES: u16 = 240;

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !(Self::MIN_SLOT_MINUTES..=Self::MAX_SLOT_MINUTES).contains(&self.slot_minutes) {
            return Err(ScheduleError::InvalidSlotLength(self.slot_minutes));
        }
        for day in DayOfWeek::ALL {
            let blocks = self.hours_on(day);
            if let Some(bad) = blocks.iter().find(|h| h.start >= h.end) {
                return Err(ScheduleError::EmptyHours { day: bad.day });
            }
            if blocks.windows(2).any(|pair| pair[1].start < pair[0].end) {
                return Err(ScheduleError::OverlappingHours { day });
            }
        }
        Ok(())
    }

    /// Working-hour blocks on `day`, ordered by start time.
    pub fn hours_on(&self, day: DayOfWeek) -> Vec<&WorkingHours> {
        let mut blocks: Vec<&WorkingHours> = self.hours.iter().filter(|h| h.day == day).collect();
        blocks.sort_by_key(|h| h.start);
        blocks
    }

    pub fn slot_span(&self) -> Span {
        i64::from(self.slot_minutes).minutes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub patient_name: String,
    #[ts(type = "string")]
    pub start: DateTime,
    pub duration_minutes: u16,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Cancelled appointments free their slot.
    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }

    pub fn end(&self) -> DateTime {
        self.start
            .saturating_add(i64::from(self.duration_minutes).minutes())
    }

    /// Half-open interval overlap: back-to-back appointments do not clash.
    pub fn overlaps(&self, start: DateTime, end: DateTime) -> bool {
        self.start < end && start < self.end()
    }
}

/// A bookable slot inside one working-hour block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeSlot {
    #[ts(type = "string")]
    pub start: Time,
    #[ts(type = "string")]
    pub end: Time,
}

impl TimeSlot {
    pub fn on(&self, date: Date) -> (DateTime, DateTime) {
        (date.to_datetime(self.start), date.to_datetime(self.end))
    }
}
