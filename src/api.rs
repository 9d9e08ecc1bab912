use std::net::SocketAddr;

use axum::{Router, extract::State, Json};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::log;

use crate::match_cache::SafeMatchCache;
use crate::models::MatchRecord;

#[derive(Clone)]
pub struct ApiState {
    pub match_cache: SafeMatchCache,
}

pub struct Api;
impl Api {
    pub fn router(route: &str, match_cache: SafeMatchCache) -> Router {
        let state = ApiState { match_cache };
        Router::new()
            .route(route, axum::routing::get(Api::get_matches))
            .with_state(state)
            .layer(ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
            )
    }

    pub async fn serve(port: u16, route: &str, match_cache: SafeMatchCache) -> Result<(), anyhow::Error> {
        let app = Api::router(route, match_cache);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        log::info!("[API] Listening on {} {}", addr, route);
        axum::Server::try_bind(&addr)?
            .serve(app.into_make_service())
            .await?;
        Ok(())
    }

    async fn get_matches(State(state): State<ApiState>) -> Json<Vec<MatchRecord>> {
        let matches = state.match_cache.get_matches().await;
        Json(matches.as_ref().clone())
    }
}
