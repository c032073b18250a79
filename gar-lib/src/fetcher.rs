use crate::credentials::Credentials;
use crate::error::RetrievalError;
use crate::http_client::{HttpClient, accept, build_request};
use crate::logging::progress_bar_style;
use crate::release::Asset;
use futures_util::StreamExt;
use reqwest::{Method, StatusCode};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const CONTENT_MEDIA_TYPE: &str = "application/octet-stream";

/// An asset that has been written to disk in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedAsset {
    pub name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Fetches `assets` one after another into `output_dir`.
///
/// Stops at the first asset that fails; later assets are not attempted and
/// files written before the failure are left in place.
pub async fn fetch_all<C: HttpClient>(
    client: &C,
    assets: &[Asset],
    output_dir: &Path,
    credentials: &Credentials,
) -> Result<Vec<RetrievedAsset>, RetrievalError> {
    let mut retrieved = Vec::with_capacity(assets.len());
    for asset in assets {
        retrieved.push(fetch_one(client, asset, output_dir, credentials).await?);
    }
    Ok(retrieved)
}

/// Streams the content of `asset` into `output_dir/<asset name>`.
///
/// The file is created before the request is sent, so a request that fails
/// leaves an empty file behind, and a broken stream leaves a partial one.
#[instrument(skip_all, fields(asset = %asset.name))]
pub async fn fetch_one<C: HttpClient>(
    client: &C,
    asset: &Asset,
    output_dir: &Path,
    credentials: &Credentials,
) -> Result<RetrievedAsset, RetrievalError> {
    tracing::info!("Retrieving {} ...", asset.name);

    let path = asset_path(output_dir, &asset.name).map_err(|source| {
        RetrievalError::FileCreate {
            asset: asset.name.clone(),
            source,
        }
    })?;
    let mut file =
        tokio::fs::File::create(&path)
            .await
            .map_err(|source| RetrievalError::FileCreate {
                asset: asset.name.clone(),
                source,
            })?;

    let request = accept(
        build_request(Method::GET, asset.content_url.as_str(), credentials)?,
        CONTENT_MEDIA_TYPE,
    );

    let response = client
        .execute(request)
        .await
        .map_err(|source| RetrievalError::Transport {
            asset: Some(asset.name.clone()),
            source,
        })?;

    if response.status() != StatusCode::OK {
        return Err(RetrievalError::Status {
            asset: Some(asset.name.clone()),
            code: response.status().as_u16(),
        });
    }

    let current_span = tracing::Span::current();
    if let Ok(style) = progress_bar_style() {
        current_span.pb_set_style(&style);
    }
    if let Some(length) = response.content_length() {
        current_span.pb_set_length(length);
    }
    current_span.pb_set_message(&format!("Downloading {}...", asset.name));

    let copy_error = |source: io::Error| RetrievalError::StreamCopy {
        asset: asset.name.clone(),
        source,
    };

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                // Whatever arrived before the failure stays on disk.
                if let Err(flush_err) = file.flush().await {
                    tracing::debug!("Failed to flush partial {}: {}", asset.name, flush_err);
                }
                return Err(copy_error(io::Error::other(e)));
            }
        };
        file.write_all(&chunk).await.map_err(copy_error)?;
        written += chunk.len() as u64;
        current_span.pb_set_position(written);
    }
    file.flush().await.map_err(copy_error)?;

    tracing::info!("{}: {} bytes", asset.name, written);
    Ok(RetrievedAsset {
        name: asset.name.clone(),
        path,
        bytes: written,
    })
}

/// Joins `name` onto `output_dir`, refusing anything but a plain file name.
fn asset_path(output_dir: &Path, name: &str) -> io::Result<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file_name)), None) if !name.contains(['/', '\\']) => {
            Ok(output_dir.join(file_name))
        }
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{name}' is not a plain file name"),
        )),
    }
}
