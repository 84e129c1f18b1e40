use clinica_core::routes;
use clinica_schedule::{Appointment, DoctorSchedule};

use crate::client::ApiClient;
use crate::error::ClientError;

pub fn fetch_schedule(client: &ApiClient, doctor_id: &str) -> Result<DoctorSchedule, ClientError> {
    client.get_json(&routes::doctor_schedule(doctor_id))
}

pub fn fetch_appointments(client: &ApiClient, doctor_id: &str) -> Result<Vec<Appointment>, ClientError> {
    client.get_json(&routes::doctor_appointments(doctor_id))
}
