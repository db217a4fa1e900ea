use labreq_api::AppState;
use labreq_api::config::{ApiConfig, StoreBackend};
use labreq_auth::jwt::TokenVerifier;
use labreq_storage::client::{build_client, build_client_with_region};
use labreq_storage::memory::MemoryDocumentStore;
use labreq_storage::repository::RequisitionRepository;
use labreq_storage::s3::S3DocumentStore;
use labreq_storage::store::DocumentStore;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = ApiConfig::from_env()?;
    let verifier = config.verifier()?;

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, store = ?config.store, "listening");

    match config.store {
        StoreBackend::S3 { bucket, region } => {
            let client = match region.as_deref() {
                Some(region) => build_client_with_region(region).await,
                None => build_client().await,
            };
            serve(listener, S3DocumentStore::new(client, bucket), verifier).await
        }
        StoreBackend::Memory => {
            tracing::warn!("in-memory store: records are lost on restart");
            serve(listener, MemoryDocumentStore::new(), verifier).await
        }
    }
}

async fn serve<S: DocumentStore + 'static>(
    listener: TcpListener,
    store: S,
    verifier: TokenVerifier,
) -> eyre::Result<()> {
    let state = AppState::new(RequisitionRepository::new(store), verifier);
    axum::serve(listener, labreq_api::router(state)).await?;
    Ok(())
}
