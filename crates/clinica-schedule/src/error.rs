use thiserror::Error;

use crate::models::DayOfWeek;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("slot length must be between 5 and 240 minutes, got {0}")]
    InvalidSlotLength(u16),

    #[error("working hours on {day} must start before they end")]
    EmptyHours { day: DayOfWeek },

    #[error("working hours on {day} overlap")]
    OverlappingHours { day: DayOfWeek },

    #[error("appointment {appointment_id} has no duration")]
    ZeroDuration { appointment_id: String },

    #[error("time arithmetic failed: {0}")]
    Time(#[from] jiff::Error),
}
