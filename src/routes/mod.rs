use actix_web::{http::Method, web, HttpRequest, HttpResponse, Result};
use serde_json::json;

use crate::{error::ApiError, state::AppState};

pub mod admin;
pub mod crud;
pub mod public;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(public::configure)
        .configure(admin::configure);
}

/// Uploads arrive as base64 inside JSON, so the framework's 32 KiB default is far too small.
pub const JSON_BODY_LIMIT: usize = 32 * 1024 * 1024;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Unmatched paths: the home page for GETs in production, a JSON 404 otherwise.
pub async fn fallback(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if state.settings.mode.is_production() && req.method() == Method::GET {
        return public::home(state).await;
    }
    Ok(HttpResponse::NotFound().json(json!({ "error": "Not found" })))
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, web, App};

    use super::{fallback, testing};
    use crate::{config::AppMode, state::AppState, store::memory::MemoryStore};

    fn state_in(mode: AppMode) -> AppState {
        let base = testing::state(Arc::new(MemoryStore::new()));
        let mut settings = (*base.settings).clone();
        settings.mode = mode;
        AppState::new(settings, base.store, base.admin)
    }

    #[actix_web::test]
    async fn development_answers_unknown_paths_with_json_404() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_in(AppMode::Development)))
                .configure(super::configure)
                .default_service(web::route().to(fallback)),
        )
        .await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/pricing").to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn production_serves_home_for_unknown_gets() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_in(AppMode::Production)))
                .configure(super::configure)
                .default_service(web::route().to(fallback)),
        )
        .await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/pricing").to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            test::call_service(&app, test::TestRequest::delete().uri("/pricing").to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
