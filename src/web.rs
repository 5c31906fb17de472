use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::allocation::{allocate, AllocationOutcome, AssignmentRecord, CapacityPlan, Diagnostic};
use crate::config::{Settings, SettingsOverrides};
use crate::display::{filter_records, sort_records, RecordFilter, SortColumn, SortDirection, SortOrder};
use crate::error::{AllocationError, Error};
use crate::export::write_records_csv;
use crate::parser::read_participants;
use crate::popularity::{candidate_pool, rank_stations};

/// Last completed run, kept in memory until the next upload
#[derive(Debug, Clone)]
pub struct StoredRun {
    pub outcome: AllocationOutcome,
    pub generated_at: DateTime<Utc>,
}

pub struct AppState {
    pub run: Mutex<Option<StoredRun>>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            run: Mutex::new(None),
            settings,
        }
    }

    fn run_guard(&self) -> Result<MutexGuard<'_, Option<StoredRun>>> {
        self.run
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("State lock poisoned"))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AllocateQuery {
    stations: Option<usize>,
    capacity: Option<usize>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignmentsQuery {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    block: String,
    #[serde(default)]
    station: String,
    sort: Option<SortColumn>,
    dir: Option<SortDirection>,
}

#[derive(Serialize)]
pub struct AllocateResponse {
    success: bool,
    record_count: usize,
    plan: CapacityPlan,
    diagnostics: Vec<Diagnostic>,
    generated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AssignmentsResponse<'a> {
    generated_at: DateTime<Utc>,
    total: usize,
    records: Vec<&'a AssignmentRecord>,
}

/// Parses an uploaded preference export and runs the allocation
pub fn run_from_csv(body: &[u8], settings: &Settings) -> std::result::Result<AllocationOutcome, Error> {
    settings.validate()?;
    let participants = read_participants(body)?;
    if participants.is_empty() {
        return Err(AllocationError::NoParticipants.into());
    }

    let ranked = rank_stations(&participants);
    let pool = candidate_pool(&ranked, settings.station_count)?;
    let mut rng = settings.rng();
    Ok(allocate(&participants, &pool, settings.capacity, settings.blocks, &mut rng)?)
}

// Upload + allocate endpoint
async fn allocate_upload(
    query: web::Query<AllocateQuery>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let settings = state.settings.clone().with_overrides(&SettingsOverrides {
        station_count: query.stations,
        capacity: query.capacity,
        blocks: None,
        seed: query.seed,
    });

    match run_from_csv(&body, &settings) {
        Ok(outcome) => {
            let generated_at = Utc::now();
            let response = AllocateResponse {
                success: true,
                record_count: outcome.records.len(),
                plan: outcome.plan,
                diagnostics: outcome.diagnostics.clone(),
                generated_at,
            };
            info!("Allocation stored: {} records", outcome.records.len());
            *state.run_guard()? = Some(StoredRun { outcome, generated_at });
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            warn!("Allocation rejected: {}", e);
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            })))
        }
    }
}

fn no_run() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({"error": "No allocation available"}))
}

// Filtered, sorted assignment listing
async fn get_assignments(
    query: web::Query<AssignmentsQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let run = state.run_guard()?;
    let Some(ref stored) = *run else {
        return Ok(no_run());
    };

    let filter = RecordFilter {
        first_name: query.first_name.clone(),
        last_name: query.last_name.clone(),
        block: query.block.clone(),
        station: query.station.clone(),
    };
    let order = match query.sort {
        Some(column) => SortOrder::By(column, query.dir.unwrap_or_default()),
        None => SortOrder::Default,
    };

    let mut records = filter_records(&stored.outcome.records, &filter);
    sort_records(&mut records, order);

    Ok(HttpResponse::Ok().json(AssignmentsResponse {
        generated_at: stored.generated_at,
        total: stored.outcome.records.len(),
        records,
    }))
}

async fn get_diagnostics(state: web::Data<AppState>) -> Result<HttpResponse> {
    let run = state.run_guard()?;
    match *run {
        Some(ref stored) => Ok(HttpResponse::Ok().json(&stored.outcome.diagnostics)),
        None => Ok(no_run()),
    }
}

async fn export_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let run = state.run_guard()?;
    let Some(ref stored) = *run else {
        return Ok(no_run());
    };

    let mut buffer = Vec::new();
    write_records_csv(&stored.outcome.records, &mut buffer)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to write CSV: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"assignments.csv\""))
        .body(buffer))
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/allocate", web::post().to(allocate_upload))
        .route("/api/assignments", web::get().to(get_assignments))
        .route("/api/diagnostics", web::get().to(get_diagnostics))
        .route("/api/export", web::get().to(export_csv));
}

pub async fn start_server(port: u16, settings: Settings) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(settings));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(web::PayloadConfig::new(16 * 1024 * 1024))
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
