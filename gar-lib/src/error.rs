use std::fmt;
use std::io;
use thiserror::Error;

/// The step of a retrieval run at which an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Construct,
    Request,
    Status,
    Decode,
    Create,
    Copy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Construct => "construct",
            Stage::Request => "request",
            Stage::Status => "status",
            Stage::Decode => "decode",
            Stage::Create => "create",
            Stage::Copy => "copy",
        };
        f.write_str(name)
    }
}

/// Every failure of a retrieval run. None of them are retried.
///
/// Variants that concern a single asset carry its name; `asset` is `None`
/// when the failure happened while resolving the release metadata.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Cannot build request for '{url}': {reason}")]
    InvalidRequest { url: String, reason: String },

    #[error("Request{} failed: {source}", for_asset(.asset))]
    Transport {
        asset: Option<String>,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request{} returned status {code}", for_asset(.asset))]
    Status { asset: Option<String>, code: u16 },

    #[error("Failed to decode release metadata: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create '{asset}': {source}")]
    FileCreate {
        asset: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{asset}': {source}")]
    StreamCopy {
        asset: String,
        #[source]
        source: io::Error,
    },
}

fn for_asset(asset: &Option<String>) -> String {
    match asset {
        Some(name) => format!(" for '{name}'"),
        None => " for release metadata".to_string(),
    }
}

impl RetrievalError {
    pub fn stage(&self) -> Stage {
        match self {
            RetrievalError::InvalidRequest { .. } => Stage::Construct,
            RetrievalError::Transport { .. } => Stage::Request,
            RetrievalError::Status { .. } => Stage::Status,
            RetrievalError::Decode { .. } => Stage::Decode,
            RetrievalError::FileCreate { .. } => Stage::Create,
            RetrievalError::StreamCopy { .. } => Stage::Copy,
        }
    }

    /// The HTTP status code of a [`RetrievalError::Status`] error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RetrievalError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Name of the asset being fetched when the error occurred.
    pub fn asset(&self) -> Option<&str> {
        match self {
            RetrievalError::Transport { asset, .. } | RetrievalError::Status { asset, .. } => {
                asset.as_deref()
            }
            RetrievalError::FileCreate { asset, .. } | RetrievalError::StreamCopy { asset, .. } => {
                Some(asset)
            }
            RetrievalError::InvalidRequest { .. } | RetrievalError::Decode { .. } => None,
        }
    }
}
