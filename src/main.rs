mod auth;
mod booking;
mod config;
mod error;
mod filters;
mod models;
mod routes;
mod state;
mod store;
mod templates;

use std::sync::Arc;

use actix_files::Files;
use actix_web::{http::header, middleware, web, App, HttpServer};

use crate::{
    auth::AdminGate,
    config::{AdminCredentials, Settings},
    state::AppState,
    store::supabase::SupabaseStore,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.mode.default_log_filter()),
    )
    .init();

    if !settings.store.configured() {
        log::warn!("SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY not set. Store calls will fail and the site will show fallback content.");
    }

    let store = SupabaseStore::new(&settings.store)?;
    let admin = AdminGate::from_credentials(AdminCredentials::from_env())
        .map_err(|err| format!("could not hash admin password: {err}"))?;

    if admin.is_open() {
        log::info!("Admin console enabled");
    }

    let address = settings.bind_address();
    let mode = settings.mode;
    let static_dir = settings.static_dir.clone();
    let state = AppState::new(settings, Arc::new(store), admin);

    log::info!("Starting GlowUp on http://{address} ({mode} mode)");

    HttpServer::new(move || {
        let files = Files::new("/static", &static_dir);
        let files = if mode.is_production() {
            files.use_etag(true).use_last_modified(true)
        } else {
            files.show_files_listing()
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Condition::new(
                !mode.is_production(),
                middleware::DefaultHeaders::new().add((header::CACHE_CONTROL, "no-cache")),
            ))
            .service(files)
            .configure(routes::configure)
            .default_service(web::route().to(routes::fallback))
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
