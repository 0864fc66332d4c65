use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use server::{ServerState, SharedStore};
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};
use thiserror::Error;
use time::UtcDateTime;
use tokio::{sync::broadcast::error::RecvError, task::JoinError};
use tokio_util::sync::CancellationToken;
use tomeo_common::{
    model::{ModelValidationError, TomeoSnowflakeGenerator, reminder::ReminderSettings},
    snowflake::{ProcessId, WorkerId},
};
use tomeo_store::{
    SocialStore,
    media::scan_media_dir,
    persist::{PersistError, Snapshot, load_snapshot, save_snapshot},
    seed::{default_user, demo_snapshot},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error loading snapshot: {0}")]
    Snapshot(#[from] PersistError),
    #[error("Error building initial data: {0}")]
    InitialData(#[from] ModelValidationError),
    #[error("Error scanning media directory: {0}")]
    MediaScan(std::io::Error),
    #[error("Blocking task failed: {0}")]
    Join(#[from] JoinError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

fn default_seed_demo_data() -> bool {
    true
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    /// Where the store is loaded from on start and saved to on shutdown.
    data_file: Option<PathBuf>,
    /// Videos found here are attached to the first posts of the feed.
    media_dir: Option<PathBuf>,
    #[serde(default = "default_seed_demo_data")]
    seed_demo_data: bool,
    #[serde(default)]
    worker_id: WorkerId,
    #[serde(default)]
    process_id: ProcessId,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tomeo_api=debug,tomeo_store=debug,tomeo_common=debug,\
                tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

/// The saved snapshot if there is one, else demo data or an empty store.
async fn initial_snapshot(env: &Env) -> Result<Snapshot, InitError> {
    if let Some(path) = env.data_file.clone() {
        let loaded = tokio::task::spawn_blocking(move || load_snapshot(&path)).await??;
        if let Some(snapshot) = loaded {
            return Ok(snapshot);
        }
    }

    if env.seed_demo_data {
        let mut rng = StdRng::from_os_rng();
        return Ok(demo_snapshot(UtcDateTime::now(), &mut rng)?);
    }

    info!("Starting with an empty store");
    Ok(Snapshot {
        current_user: default_user()?,
        posts: Vec::new(),
        friends: Vec::new(),
        reminder_settings: ReminderSettings::default(),
    })
}

async fn build_store(env: &Env) -> Result<SocialStore, InitError> {
    let id_generator = TomeoSnowflakeGenerator::new(env.worker_id, env.process_id);
    let mut store = SocialStore::from_snapshot(initial_snapshot(env).await?, id_generator)?;

    if let Some(dir) = env.media_dir.clone() {
        let pairs = tokio::task::spawn_blocking(move || scan_media_dir(&dir))
            .await?
            .map_err(InitError::MediaScan)?;
        let attached = store.attach_media_pairs(&pairs);
        info!(attached, "Attached local media");
    }

    Ok(store)
}

/// Logs every store change until `cancel` fires.
async fn log_events(store: SharedStore, cancel: CancellationToken) {
    let mut events = store.lock().await.subscribe();

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            event = events.recv() => match event {
                Ok(event) => debug!(kind = event.kind(), ?event, "Store changed"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Could not listen for shutdown signal");
    }
    info!("Shutting down");
    cancel.cancel();
}

async fn save_on_exit(env: &Env, store: &SharedStore) {
    let Some(path) = env.data_file.clone() else {
        return;
    };

    let snapshot = store.lock().await.snapshot();
    match tokio::task::spawn_blocking(move || save_snapshot(&path, &snapshot)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => error!(%err, "Could not save snapshot"),
        Err(err) => error!(%err, "Snapshot task failed"),
    }
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let state = ServerState::new(build_store(&env).await?);
    let cancel = CancellationToken::new();
    let event_log = tokio::spawn(log_events(state.store.clone(), cancel.clone()));

    let tracing_layer = TraceLayer::new_for_http();
    let app = server::routes()
        .layer(tracing_layer)
        .with_state(state.clone());

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Listening");
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .map_err(InitError::TcpServe);

    cancel.cancel();
    if let Err(err) = event_log.await {
        warn!(%err, "Event log task failed");
    }
    save_on_exit(&env, &state.store).await;

    served
}
