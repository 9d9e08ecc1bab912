use std::{sync::Arc, time::Duration, net::SocketAddr};

use axum::{Router, extract::State, response::IntoResponse, body::StreamBody, routing::get, http::HeaderMap};
use reqwest::StatusCode;
use tokio::{sync::RwLock, task::JoinHandle};
use tokio_util::io::ReaderStream;

#[derive(Default)]
pub struct AppState {
    pub today_calls: usize,
    pub user_agents: Vec<String>,
}

pub struct ExternalServer {
    port: u16,
    handles: Vec<JoinHandle<()>>,
    pub api_state: Arc<RwLock<AppState>>,
}

impl Drop for ExternalServer {
    fn drop(&mut self) {
        for e in &self.handles {
            e.abort();
        }
    }
}

impl ExternalServer {
    pub fn new(port: u16) -> ExternalServer {
        ExternalServer { port, handles: vec![], api_state: Arc::new(RwLock::new(AppState::default())) }
    }

    pub async fn start(&mut self) {
        let external_mock = {
            let port = self.port;
            let state = self.api_state.clone();
            tokio::spawn(async move { ExternalServer::serve_external_data(state, port).await })
        };
        self.handles.push(external_mock);

        tokio::time::sleep(Duration::from_secs(1)).await; // wait for mock to start
    }

    pub fn get_url(&self, path: &str) -> String {
        format!("http://localhost:{}{path}", self.port)
    }

    pub async fn today_calls(&self) -> usize {
        self.api_state.read().await.today_calls
    }

    async fn serve_external_data(state: Arc<RwLock<AppState>>, port: u16) {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let app = Router::new()
            .route("/today/", get(ExternalServer::get_today_file))
            .route("/empty/", get(ExternalServer::get_empty))
            .route("/broken/", get(ExternalServer::get_broken))
            .route("/slow/", get(ExternalServer::get_slow))
            .with_state(state);

        axum::Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .unwrap();
    }

    async fn get_today_file(State(state): State<Arc<RwLock<AppState>>>, headers: HeaderMap) -> impl IntoResponse {
        {
            let mut state = state.write().await;
            state.today_calls += 1;
            if let Some(ua) = headers.get("user-agent").and_then(|e| e.to_str().ok()) {
                state.user_agents.push(ua.to_string());
            }
        }
        ExternalServer::get_file_from("./tests/integration/external/today.html".to_string()).await
    }

    async fn get_empty() -> impl IntoResponse {
        "<html><body><p>لا توجد مباريات اليوم</p></body></html>"
    }

    async fn get_broken() -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, "500".to_string())
    }

    async fn get_slow() -> impl IntoResponse {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "<html><body></body></html>"
    }

    async fn get_file_from(path: String) -> impl IntoResponse {
        let file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(err) => return Err((StatusCode::NOT_FOUND, format!("File not found: {}", err))),
        };
        let stream = ReaderStream::new(file);
        let body = StreamBody::new(stream);
        Ok(body)
    }
}
