//! current-density preview server
//! - Config file watcher
//! - Field sampling on change
//! - WebSocket binary frame streaming
//! - JSON and binary snapshots over HTTP

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use clap::Parser;
use futures::{SinkExt, StreamExt};
use notify_debouncer_mini::{
    new_debouncer,
    notify::{RecursiveMode, Watcher},
    DebounceEventResult,
};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::{broadcast, mpsc, RwLock};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod field;

use field::FieldSnapshot;

#[derive(Parser, Debug)]
#[command(name = "current-density-server")]
#[command(about = "Stream sampled current-density fields to browser viewers")]
struct Args {
    /// JSON config to watch (defaults are served when omitted)
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,
}

struct AppState {
    field_tx: broadcast::Sender<Arc<FieldSnapshot>>,
    current_field: RwLock<Option<Arc<FieldSnapshot>>>,
    revision: AtomicU64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let (field_tx, _) = broadcast::channel::<Arc<FieldSnapshot>>(16);
    let state = Arc::new(AppState {
        field_tx,
        current_field: RwLock::new(None),
        revision: AtomicU64::new(0),
    });

    // Initial sample
    recompute(&state, args.config.clone()).await;

    // File watcher
    if let Some(path) = args.config.clone() {
        info!("Watching: {:?}", path);
        let state_clone = state.clone();
        tokio::spawn(async move {
            if let Err(e) = watch_file(path, state_clone).await {
                error!("File watcher stopped: {}", e);
            }
        });
    }

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/field", get(field_json))
        .route("/field.bin", get(field_binary))
        .route("/status", get(field_status))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Server: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Sample off the async runtime and publish the result to every client
async fn recompute(state: &Arc<AppState>, config: Option<PathBuf>) {
    let revision = state.revision.fetch_add(1, Ordering::SeqCst) + 1;

    let result = tokio::task::spawn_blocking(move || {
        field::compute_snapshot(config.as_deref(), revision)
    })
    .await;

    match result {
        Ok(Ok(snapshot)) => {
            info!(
                "Generated field rev {}: {} datasets, {} bytes",
                revision,
                snapshot.status.datasets.len(),
                snapshot.binary.len()
            );
            let snapshot = Arc::new(snapshot);
            *state.current_field.write().await = Some(snapshot.clone());
            let _ = state.field_tx.send(snapshot);
        }
        Ok(Err(e)) => error!("Field error: {:#}", e),
        Err(e) => error!("Sampling task failed: {}", e),
    }
}

async fn watch_file(path: PathBuf, state: Arc<AppState>) -> Result<()> {
    let (notify_tx, mut notify_rx) = mpsc::channel::<PathBuf>(10);

    let mut debouncer = new_debouncer(Duration::from_millis(200), move |res: DebounceEventResult| {
        if let Ok(events) = res {
            for event in events {
                let _ = notify_tx.blocking_send(event.path);
            }
        }
    })?;

    let watch_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    debouncer.watcher().watch(watch_dir, RecursiveMode::NonRecursive)?;

    info!("Watching directory: {:?}", watch_dir);

    while let Some(changed) = notify_rx.recv().await {
        if changed == path || changed.file_name() == path.file_name() {
            info!("Config changed, resampling field...");
            recompute(&state, Some(path.clone())).await;
        }
    }

    warn!("Watcher channel closed");
    Ok(())
}

async fn current(state: &AppState) -> Option<Arc<FieldSnapshot>> {
    state.current_field.read().await.clone()
}

async fn field_json(State(state): State<Arc<AppState>>) -> Response {
    match current(&state).await {
        Some(snapshot) => (
            [(header::CONTENT_TYPE, "application/json")],
            snapshot.json.clone(),
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn field_binary(State(state): State<Arc<AppState>>) -> Response {
    match current(&state).await {
        Some(snapshot) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            snapshot.binary.clone(),
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn field_status(State(state): State<Arc<AppState>>) -> Response {
    match current(&state).await {
        Some(snapshot) => Json(snapshot.status.clone()).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.field_tx.subscribe();

    // Send current field if available
    if let Some(snapshot) = current(&state).await {
        if sender.send(Message::Binary(snapshot.binary.clone().into())).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            Ok(snapshot) = rx.recv() => {
                if sender.send(Message::Binary(snapshot.binary.clone().into())).await.is_err() {
                    break;
                }
            }
            Some(msg) = receiver.next() => {
                match msg {
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
            else => break,
        }
    }
}
