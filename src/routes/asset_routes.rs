use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::gateway::LedgerContract;
use crate::models::asset::Asset;
use crate::services::asset_service::{create_asset_on_ledger, read_asset_from_ledger};

pub struct AppState {
    pub contract: Arc<dyn LedgerContract>,
}

pub fn initialize_app_state(contract: Arc<dyn LedgerContract>) -> AppState {
    AppState { contract }
}

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Deserialize)]
pub struct AssetQuery {
    pub dealerid: Option<String>,
}

/// Mounts `/assets`: GET reads, POST creates, anything else is a 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES)).service(
        web::resource("/assets")
            .route(web::get().to(get_asset))
            .route(web::post().to(create_asset))
            .default_service(web::to(method_not_allowed)),
    );
}

pub async fn get_asset(query: web::Query<AssetQuery>, app_state: web::Data<AppState>) -> impl Responder {
    let dealer_id = match query.into_inner().dealerid {
        Some(id) if !id.trim().is_empty() => id,
        _ => return HttpResponse::BadRequest().body("Missing dealerid query parameter"),
    };

    match read_asset_from_ledger(app_state.contract.as_ref(), &dealer_id).await {
        Ok(payload) => HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(payload),
        Err(e) => {
            log::error!("Failed to read asset {}: {}", dealer_id, e);
            HttpResponse::InternalServerError().body(format!("Failed to evaluate transaction: {}", e))
        }
    }
}

pub async fn create_asset(body: web::Bytes, app_state: web::Data<AppState>) -> impl Responder {
    let asset: Asset = match serde_json::from_slice(&body) {
        Ok(asset) => asset,
        Err(e) => return HttpResponse::BadRequest().body(format!("Invalid asset JSON: {}", e)),
    };

    if asset.dealer_id.trim().is_empty() {
        return HttpResponse::BadRequest().body("DEALERID must not be empty");
    }

    match create_asset_on_ledger(app_state.contract.as_ref(), &asset).await {
        Ok(()) => HttpResponse::Created()
            .body(format!("Asset {} created successfully", asset.dealer_id)),
        Err(e) => {
            log::error!("Failed to create asset {}: {}", asset.dealer_id, e);
            HttpResponse::InternalServerError().body(format!("Failed to submit transaction: {}", e))
        }
    }
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().body("Method not allowed")
}
