//! Fetches the meta-model document over HTTP.

use std::time::Duration;

use tracing::debug;

use crate::error::Error;
use crate::metamodel::Model;

/// Upstream location of the published meta-model document.
pub const META_MODEL_URL: &str = "https://raw.githubusercontent.com/microsoft/vscode-languageserver-node/refs/heads/main/protocol/metaModel.json";

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Downloads and decodes the meta-model from `url`.
///
/// A single GET with no retry: a transport or HTTP-status failure surfaces
/// as [`Error::Transport`], a body that fails strict decoding as
/// [`Error::Decode`].
pub async fn fetch_meta_model(url: &str) -> Result<Model, Error> {
    debug!(url, "Fetching meta-model.");
    let client = reqwest::Client::builder().build()?;
    let response = client
        .get(url)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .send()
        .await?
        .error_for_status()?;
    let body = response.bytes().await?;
    debug!(bytes = body.len(), "Fetched meta-model document.");
    let model: Model = serde_json::from_slice(&body)?;
    Ok(model)
}
