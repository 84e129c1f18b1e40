//! clinica-schedule
//!
//! Doctor working hours cut into fixed-length slots, and the daily and
//! weekly grids a front desk uses to see which slots are free, booked or
//! double-booked.

pub mod conflicts;
pub mod error;
pub mod grid;
pub mod models;

pub use conflicts::{Conflict, find_conflicts};
pub use error::ScheduleError;
pub use grid::{DailyGrid, DailyRow, GridCell, WeeklyGrid, WeeklyRow, daily_grid, slots_for_day, weekly_grid};
pub use models::{Appointment, AppointmentStatus, DayOfWeek, DoctorSchedule, TimeSlot, WorkingHours};
