//! Generic list/create/patch/delete passthrough for the catalog tables.

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::{TABLE_GALLERY, TABLE_OFFERS, TABLE_REVIEWS, TABLE_SERVICES},
    state::AppState,
    store::Query,
};

/// One entry of the dispatch table, attached to its routes as request data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManagedTable {
    pub name: &'static str,
}

pub const MANAGED_TABLES: [ManagedTable; 4] = [
    ManagedTable { name: TABLE_SERVICES },
    ManagedTable { name: TABLE_OFFERS },
    ManagedTable { name: TABLE_GALLERY },
    ManagedTable { name: TABLE_REVIEWS },
];

/// Mounts `/{table}` and `/{table}/{id}` for every managed table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    for table in MANAGED_TABLES {
        cfg.service(
            web::scope(&format!("/{}", table.name))
                .app_data(web::Data::new(table))
                .service(
                    web::resource("")
                        .route(web::get().to(list_rows))
                        .route(web::post().to(create_row)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::patch().to(update_row))
                        .route(web::delete().to(delete_row)),
                ),
        );
    }
}

async fn list_rows(
    state: web::Data<AppState>,
    table: web::Data<ManagedTable>,
) -> Result<HttpResponse, ApiError> {
    let rows = state
        .store
        .select(table.name, &Query::new().newest_first())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn create_row(
    state: web::Data<AppState>,
    table: web::Data<ManagedTable>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let row = state.store.insert(table.name, payload.into_inner()).await?;
    log::info!("Created row in {}", table.name);
    Ok(HttpResponse::Ok().json(row))
}

async fn update_row(
    state: web::Data<AppState>,
    table: web::Data<ManagedTable>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let row = state
        .store
        .update(table.name, &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(row))
}

async fn delete_row(
    state: web::Data<AppState>,
    table: web::Data<ManagedTable>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    state.store.delete(table.name, &id).await?;
    log::info!("Deleted row {id} from {}", table.name);
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
