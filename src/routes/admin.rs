use actix_web::{http::header, middleware::from_fn, web, HttpResponse, Result};
use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    auth::admin_guard,
    error::ApiError,
    models::{AppointmentRow, AppointmentStatus, TABLE_APPOINTMENTS},
    routes::crud,
    state::AppState,
    store::{Query, Row},
    templates::render,
};

#[derive(Template)]
#[template(path = "admin_login.html")]
struct AdminLoginTemplate {}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
struct AdminDashboardTemplate {
    statuses: Vec<&'static str>,
    tables: Vec<&'static str>,
}

#[derive(Deserialize)]
struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct AppointmentFilter {
    service: Option<String>,
    status: Option<String>,
    date: Option<String>,
}

impl AppointmentFilter {
    fn to_query(&self) -> Query {
        let mut query = Query::new();
        let pairs = [
            ("service", &self.service),
            ("status", &self.status),
            ("appointment_date", &self.date),
        ];
        for (column, value) in pairs {
            if let Some(value) = value.as_deref().filter(|value| !value.trim().is_empty()) {
                query = query.eq(column, value);
            }
        }
        query.newest_first()
    }
}

#[derive(Deserialize)]
struct StatusUpdate {
    status: AppointmentStatus,
}

#[derive(Deserialize)]
struct UploadPayload {
    name: String,
    #[serde(rename = "type", default)]
    content_type: Option<String>,
    data: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/admin").route(web::get().to(login_page)))
        .service(web::resource("/admin/dashboard").route(web::get().to(dashboard_page)))
        .service(web::resource("/api/admin/login").route(web::post().to(login)))
        .service(
            web::scope("/api/admin")
                .wrap(from_fn(admin_guard))
                .service(
                    web::resource("/appointments").route(web::get().to(list_appointments)),
                )
                .service(
                    web::resource("/appointments/export").route(web::get().to(export_appointments)),
                )
                .service(
                    web::resource("/appointments/{id}").route(web::patch().to(update_appointment)),
                )
                .service(web::resource("/upload").route(web::post().to(upload)))
                .configure(crud::configure),
        );
}

async fn login_page() -> Result<HttpResponse> {
    Ok(render(AdminLoginTemplate {}))
}

async fn dashboard_page() -> Result<HttpResponse> {
    Ok(render(AdminDashboardTemplate {
        statuses: AppointmentStatus::ALL.iter().map(|status| status.as_str()).collect(),
        tables: crud::MANAGED_TABLES.iter().map(|table| table.name).collect(),
    }))
}

async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    match state.admin.login(&payload.username, &payload.password) {
        Ok(token) => {
            log::info!("Admin login for {}", payload.username);
            Ok(HttpResponse::Ok()
                .insert_header((header::CACHE_CONTROL, "no-store"))
                .json(LoginResponse { token }))
        }
        Err(err) => {
            log::warn!("Failed admin login attempt for {:?}", payload.username);
            Err(err)
        }
    }
}

async fn list_appointments(
    state: web::Data<AppState>,
    filter: web::Query<AppointmentFilter>,
) -> Result<HttpResponse, ApiError> {
    let rows = state
        .store
        .select(TABLE_APPOINTMENTS, &filter.to_query())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn update_appointment(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<StatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    let appointment_id = path.into_inner();
    let status = payload.status;
    let row = state
        .store
        .update(
            TABLE_APPOINTMENTS,
            &appointment_id,
            json!({ "status": status }),
        )
        .await?;
    log::info!("Appointment {appointment_id} set to {status}");
    Ok(HttpResponse::Ok().json(row))
}

async fn export_appointments(
    state: web::Data<AppState>,
    filter: web::Query<AppointmentFilter>,
) -> Result<HttpResponse, ApiError> {
    let rows = state
        .store
        .select(TABLE_APPOINTMENTS, &filter.to_query())
        .await?;
    let filename = format!("appointments-{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(appointments_csv(rows)))
}

async fn upload(
    state: web::Data<AppState>,
    payload: web::Json<UploadPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let bytes = decode_upload(&payload.data)?;
    let object_name = format!("{}-{}", Utc::now().timestamp_millis(), payload.name);
    let content_type = payload
        .content_type
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let bucket = state.upload_bucket();
    let path = state
        .store
        .upload(bucket, &object_name, &content_type, bytes)
        .await?;
    let url = state.store.public_url(bucket, &path);
    log::info!("Uploaded {path} to {bucket}");
    Ok(HttpResponse::Ok().json(json!({ "url": url })))
}

/// Accepts raw base64 or a `data:<type>;base64,` URL.
fn decode_upload(data: &str) -> Result<Vec<u8>, ApiError> {
    let encoded = match data.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let encoded: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(encoded)
        .map_err(|err| ApiError::BadRequest(format!("Invalid base64 payload: {err}")))
}

fn appointments_csv(rows: Vec<Row>) -> String {
    let mut lines = vec!["Name,Phone,Service,Date,Time,Status".to_string()];
    for row in rows {
        let appointment: AppointmentRow =
            serde_json::from_value(serde_json::Value::Object(row)).unwrap_or_default();
        let fields = [
            appointment.name,
            appointment.phone,
            appointment.service,
            appointment.appointment_date,
            appointment.appointment_time,
            appointment.status,
        ];
        lines.push(
            fields
                .iter()
                .map(|field| csv_field(field))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
