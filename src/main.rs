use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use scribe_sync::application::ports::{CredentialsRepository, RecordingRepository};
use scribe_sync::application::services::{
    ChatService, CredentialsService, ReconciliationService, RecordingService, RetryPolicy,
    TranscriptionOrchestrator, UploadService,
};
use scribe_sync::infrastructure::auth::JwtAuthenticator;
use scribe_sync::infrastructure::observability::{TracingConfig, init_tracing};
use scribe_sync::infrastructure::persistence::{
    InMemoryCredentialsRepository, InMemoryRecordingRepository, PgCredentialsRepository,
    PgRecordingRepository, create_pool, run_migrations,
};
use scribe_sync::infrastructure::storage::StorageProviderFactory;
use scribe_sync::infrastructure::transcription::GladiaClient;
use scribe_sync::presentation::config::{DatabaseProviderSetting, DatabaseSettings};
use scribe_sync::presentation::{AppState, Environment, Settings, create_router};

type Repositories = (Arc<dyn RecordingRepository>, Arc<dyn CredentialsRepository>);

async fn build_repositories(settings: &DatabaseSettings) -> anyhow::Result<Repositories> {
    match settings.provider {
        DatabaseProviderSetting::Postgres => {
            let url = settings
                .url
                .as_deref()
                .context("database.url is required for the postgres provider")?;
            let pool = create_pool(url, settings.max_connections).await?;
            if settings.run_migrations {
                run_migrations(&pool).await?;
            }
            let recordings: Arc<dyn RecordingRepository> =
                Arc::new(PgRecordingRepository::new(pool.clone()));
            let credentials: Arc<dyn CredentialsRepository> =
                Arc::new(PgCredentialsRepository::new(pool));
            Ok((recordings, credentials))
        }
        DatabaseProviderSetting::Memory => {
            tracing::warn!("Using in-memory repositories, data is lost on restart");
            let recordings: Arc<dyn RecordingRepository> =
                Arc::new(InMemoryRecordingRepository::new());
            let credentials: Arc<dyn CredentialsRepository> =
                Arc::new(InMemoryCredentialsRepository::new());
            Ok((recordings, credentials))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        environment,
        &settings.logging,
    ));

    if settings.auth.jwt_secret.is_empty() {
        if environment == Environment::Prod {
            anyhow::bail!("auth.jwt_secret must be set in prod");
        }
        tracing::warn!("auth.jwt_secret is empty, tokens are signed with an empty key");
    }

    let (recordings, credentials) = build_repositories(&settings.database).await?;
    let storage_provider = StorageProviderFactory::create(&settings.storage)?;

    let transcription = &settings.transcription;
    let client = Arc::new(
        GladiaClient::new(transcription.base_url.clone())
            .with_polling(transcription.poll_interval(), transcription.max_polls),
    );
    let policy = RetryPolicy {
        max_attempts: transcription.max_attempts,
        backoff_step: transcription.backoff_step(),
        signed_url_ttl: transcription.signed_url_ttl(),
    };
    let orchestrator = Arc::new(
        TranscriptionOrchestrator::new(
            Arc::clone(&recordings),
            Arc::clone(&storage_provider),
            client,
            policy,
        )
        .with_single_flight(transcription.single_flight),
    );

    let state = AppState {
        authenticator: Arc::new(JwtAuthenticator::new(settings.auth.jwt_secret.as_bytes())),
        recording_service: Arc::new(RecordingService::new(
            Arc::clone(&recordings),
            Arc::clone(&credentials),
            Arc::clone(&storage_provider),
            policy.signed_url_ttl,
        )),
        chat_service: Arc::new(ChatService::new(
            Arc::clone(&recordings),
            Arc::clone(&credentials),
            Arc::clone(&orchestrator),
        )),
        reconciliation_service: Arc::new(ReconciliationService::new(
            Arc::clone(&recordings),
            Arc::clone(&credentials),
            Arc::clone(&storage_provider),
            Arc::clone(&orchestrator),
        )),
        upload_service: Arc::new(UploadService::new(
            Arc::clone(&recordings),
            Arc::clone(&credentials),
            Arc::clone(&storage_provider),
            Arc::clone(&orchestrator),
        )),
        credentials_service: Arc::new(CredentialsService::new(Arc::clone(&credentials))),
        orchestrator,
        max_upload_bytes: settings.server.max_upload_bytes,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("invalid server address")?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = %environment, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
