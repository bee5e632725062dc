use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The credential for this service was never configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Network failure, timeout or unreadable body.
    #[error("Request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{service} error: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The service answered 2xx with a body we cannot use.
    #[error("Unexpected response from {service}: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },
}

impl GenerationError {
    pub(crate) fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { service, source }
    }
}

/// Pass 2xx responses through, turn anything else into `Upstream`.
pub(crate) async fn ensure_success(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, GenerationError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::error!(service, status = %status, body = %body, "Upstream request failed");
    Err(GenerationError::Upstream {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Decode a successful response body, reporting an unusable one as `Malformed`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<T, GenerationError> {
    let body = ensure_success(service, resp)
        .await?
        .bytes()
        .await
        .map_err(GenerationError::transport(service))?;
    decode_json(service, &body)
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    service: &'static str,
    body: &[u8],
) -> Result<T, GenerationError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!(service, error = %e, "Undecodable response body");
        GenerationError::Malformed {
            service,
            detail: e.to_string(),
        }
    })
}
