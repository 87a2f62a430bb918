use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;

use crate::config::Config;
use crate::gateway::identity::{load_certificate, new_identity, new_signer};
use crate::gateway::{create_channel, Gateway};
use crate::routes::asset_routes::{configure, initialize_app_state};
mod config;
mod gateway;
mod models;
mod routes;
mod services;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("invalid configuration")?;

    let identity = new_identity(&config.msp_id, &config.cert_path).context("failed to load client identity")?;
    let signer = new_signer(&config.key_dir).context("failed to load signing key")?;
    let tls_ca = load_certificate(&config.tls_cert_path).context("failed to load TLS root certificate")?;
    log::info!("Loaded identity for {}", identity.msp_id());

    let channel = create_channel(&config.peer_endpoint, &config.gateway_peer, &tls_ca)
        .await
        .with_context(|| format!("failed to connect to gateway peer {}", config.peer_endpoint))?;

    let gateway = Gateway::connect(channel, identity, signer, config.timeouts);
    let network = gateway.network(&config.channel_name);
    let contract = network.contract(&config.chaincode_name);
    log::info!(
        "Using chaincode {} on channel {}",
        contract.chaincode_name(),
        network.name()
    );

    let app_state = web::Data::new(initialize_app_state(Arc::new(contract)));

    log::info!("Listening on {}", config.http_bind);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(app_state.clone()) // Pass the application state
            .configure(configure)
    })
    .bind(&config.http_bind)?
    .run()
    .await?;

    Ok(())
}
