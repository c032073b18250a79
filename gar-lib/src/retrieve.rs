use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::RetrievalError;
use crate::fetcher::{RetrievedAsset, fetch_all};
use crate::http_client::HttpClient;
use crate::release::{RetrievalTarget, resolve};

/// Retrieves every asset of the release named by `target` into
/// `config.output_dir`.
///
/// The asset list is resolved in full before the first download starts.
pub async fn retrieve_assets<C: HttpClient>(
    client: &C,
    config: &Config,
    target: &RetrievalTarget,
    credentials: &Credentials,
) -> Result<Vec<RetrievedAsset>, RetrievalError> {
    let assets = resolve(client, &config.api_origin, target, credentials)
        .await
        .inspect_err(|e| log_failure(target, e))?;
    if assets.is_empty() {
        tracing::info!("Release {} has no assets", target);
    }
    fetch_all(client, &assets, &config.output_dir, credentials)
        .await
        .inspect_err(|e| log_failure(target, e))
}

fn log_failure(target: &RetrievalTarget, err: &RetrievalError) {
    tracing::debug!("Retrieval of {} stopped at the {} stage", target, err.stage());
}
