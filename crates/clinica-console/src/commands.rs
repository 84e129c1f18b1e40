use std::path::{Path, PathBuf};
use std::sync::Arc;

use clinica_client::config::{self, ClientConfig};
use clinica_client::{ApiClient, RestRecordStore, schedules};
use clinica_core::{Draft, ErrorMap};
use clinica_forms::Step;
use clinica_schedule::{Appointment, Conflict, DoctorSchedule, GridCell, WeeklyGrid};
use clinica_wizard::{SubmitMode, SubmitResult, WizardHandle, WizardSession};
use eyre::{Result, WrapErr, bail, eyre};
use jiff::civil::Date;

const API_URL_ENV: &str = "CLINICA_API_URL";

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("failed to parse {}", path.display()))
}

fn read_draft(path: &Path) -> Result<Draft> {
    Ok(Draft::from_value(read_json(path)?)?)
}

/// Saved config with the `CLINICA_API_URL` override applied.
fn client_config() -> Result<ClientConfig> {
    if !config::has_config() {
        bail!("no client config found; run `clinica configure` first");
    }
    let mut config = config::load_config()?;
    if let Ok(url) = std::env::var(API_URL_ENV) {
        tracing::debug!(%url, "using API URL from environment");
        config.api_base_url = url;
    }
    Ok(config)
}

fn print_errors(errors: &ErrorMap) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(errors)?);
    Ok(())
}

pub fn configure(api_url: &str, author_id: &str) -> Result<()> {
    let path = config::save_config(&ClientConfig::new(api_url, author_id))?;
    println!("Saved config to {}", path.display());
    Ok(())
}

pub fn steps(form_id: &str, draft: &Path) -> Result<()> {
    let session = WizardSession::for_form(form_id, SubmitMode::Create, read_draft(draft)?)?;
    for (i, step) in session.steps().iter().enumerate() {
        println!("{:>2}. {:<28} {}", i + 1, step.title(), step.id());
    }
    Ok(())
}

pub fn validate(form_id: &str, draft: &Path, step_id: Option<&str>) -> Result<()> {
    let form = clinica_forms::get_form(form_id)?;
    let draft = read_draft(draft)?;

    let step = match step_id {
        Some(id) => form.step(id).ok_or_else(|| eyre!("form {form_id} has no step {id}"))?,
        None => form.review_step(),
    };
    let errors = step.validate(&draft);
    print_errors(&errors)?;

    if !errors.is_empty() {
        bail!("{} field(s) failed validation", errors.len());
    }
    Ok(())
}

pub async fn submit(form_id: &str, draft: &Path, id: Option<String>) -> Result<()> {
    let mode = match id {
        Some(id) => SubmitMode::Update { id },
        None => SubmitMode::Create,
    };
    let mut session = WizardSession::for_form(form_id, mode, read_draft(draft)?)?;

    while !session.is_on_last_step() {
        if !session.go_next() {
            print_errors(session.errors())?;
            bail!("step {} did not validate", session.current_step().id());
        }
    }

    let config = client_config()?;
    let store = Arc::new(RestRecordStore::new(ApiClient::from_config(&config)));
    let handle = WizardHandle::new(session, store, config.author_id.clone());

    match handle.submit().await {
        SubmitResult::Completed { record } => {
            match record {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("Saved."),
            }
            Ok(())
        }
        SubmitResult::Invalid => {
            print_errors(&handle.snapshot().await.errors)?;
            bail!("draft did not validate")
        }
        SubmitResult::Failed(message) => bail!("submission failed: {message}"),
        other => bail!("submission not performed: {other:?}"),
    }
}

pub async fn schedule(
    schedule_file: Option<PathBuf>,
    appointments_file: Option<PathBuf>,
    doctor: Option<String>,
    week: &str,
) -> Result<()> {
    let week_start: Date = week.parse().wrap_err_with(|| format!("invalid week start {week}"))?;

    let (schedule, appointments): (DoctorSchedule, Vec<Appointment>) = match (schedule_file, doctor) {
        (Some(path), _) => {
            let appointments = match appointments_file {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            (read_json(&path)?, appointments)
        }
        (None, Some(doctor_id)) => {
            let client = ApiClient::from_config(&client_config()?);
            tokio::task::spawn_blocking(move || -> Result<_> {
                Ok((
                    schedules::fetch_schedule(&client, &doctor_id)?,
                    schedules::fetch_appointments(&client, &doctor_id)?,
                ))
            })
            .await??
        }
        (None, None) => bail!("pass --schedule <file> or --doctor <id>"),
    };

    let grid = clinica_schedule::weekly_grid(&schedule, week_start, &appointments)?;
    println!("{} ({})", schedule.doctor_name, schedule.doctor_id);
    print_grid(&grid);

    let conflicts = clinica_schedule::find_conflicts(&schedule, &appointments)?;
    if !conflicts.is_empty() {
        println!();
        for conflict in &conflicts {
            match conflict {
                Conflict::Overlap { first, second } => println!("overlap: {first} / {second}"),
                Conflict::OutsideHours { appointment_id } => {
                    println!("outside working hours: {appointment_id}")
                }
            }
        }
    }
    Ok(())
}

fn print_grid(grid: &WeeklyGrid) {
    print!("{:<8}", "");
    for day in &grid.days {
        print!("{:<14}", day.strftime("%a %d").to_string());
    }
    println!();

    for row in &grid.rows {
        print!("{:<8}", row.start.strftime("%H:%M").to_string());
        for cell in &row.cells {
            let label = match cell {
                GridCell::Free => "free".to_string(),
                GridCell::Booked { appointment_id } => appointment_id.clone(),
                GridCell::Conflict { appointment_ids } => format!("!{}", appointment_ids.len()),
                GridCell::Unavailable => "-".to_string(),
            };
            print!("{label:<14}");
        }
        println!();
    }
}
