#[macro_use]
extern crate tracing;

use std::sync::Arc;

use axum::{Router, extract::FromRef};

use axum_extra::middleware::option_layer;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

mod api;
mod auth;
mod config;
mod error;
mod middleware;
mod trace;
mod util;

pub use config::CONFIG;
pub use error::AuthError;

use crate::auth::{MemoryStore, SessionManager, SessionStore};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    launch_info();
    dotenv().ok();
    trace::init();

    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let manager = match SessionManager::from_config(&CONFIG.auth, store) {
        Ok(manager) => Arc::new(manager),
        Err(err) => panic!("{}", err),
    };

    let cors = if CONFIG.debug {
        Some(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_methods(Any)
                .allow_origin(Any),
        )
    } else {
        None
    };
    let cors = option_layer(cors);
    let layer = ServiceBuilder::new()
        .layer(middleware::trace::TraceLayer)
        .layer(cors);
    let state = AppState { auth: manager };
    let app = Router::new()
        .nest("/api", api::routes(&state))
        .with_state(state)
        .layer(layer);

    let listener = TcpListener::bind(CONFIG.addr).await.unwrap();
    let local_addr = listener.local_addr().unwrap();
    info!("listening on http://{}", local_addr);
    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {}", err);
    }
}

#[derive(FromRef, Clone)]
pub struct AppState {
    pub auth: Arc<SessionManager>,
}

fn launch_info() {
    println!();
    println!(
        "=================== Starting Authgate {} ===================",
        env!("CARGO_PKG_VERSION")
    );
    println!();
}
