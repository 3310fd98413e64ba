//! Provider response payloads.
//!
//! The provider returns synthesized audio in one of three shapes. Each
//! variant has its own conversion routine; all converge on a single
//! in-memory byte buffer before the bytes leave this crate.

use bytes::Bytes;
use futures_util::StreamExt;
use lector_domain::NarrationError;

/// Closed set of shapes a synthesis response can arrive in.
pub enum ProviderPayload {
    /// Audio carried inline in the response body, already decoded.
    Inline(Bytes),
    /// Raw binary body to be drained chunk by chunk.
    Stream(reqwest::Response),
    /// Audio hosted elsewhere, fetched with a follow-up GET.
    Remote(String),
}

impl ProviderPayload {
    /// Normalize this payload to one in-memory byte sequence.
    pub async fn into_bytes(self, http: &reqwest::Client) -> Result<Bytes, NarrationError> {
        match self {
            Self::Inline(bytes) => Ok(bytes),
            Self::Stream(response) => drain_body(response).await,
            Self::Remote(url) => fetch_remote(http, &url).await,
        }
    }
}

impl std::fmt::Debug for ProviderPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline(bytes) => f.debug_tuple("Inline").field(&bytes.len()).finish(),
            Self::Stream(_) => f.debug_tuple("Stream").finish(),
            Self::Remote(url) => f.debug_tuple("Remote").field(url).finish(),
        }
    }
}

/// Fully drain a streamed binary body.
async fn drain_body(response: reqwest::Response) -> Result<Bytes, NarrationError> {
    let mut stream = response.bytes_stream();
    let mut buf = Vec::new();
    while let Some(piece) = stream.next().await {
        let piece = piece
            .map_err(|e| NarrationError::retryable(format!("audio stream interrupted: {e}")))?;
        buf.extend_from_slice(&piece);
    }
    Ok(buf.into())
}

/// Fetch an indirectly referenced audio artifact.
async fn fetch_remote(http: &reqwest::Client, url: &str) -> Result<Bytes, NarrationError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| NarrationError::retryable(format!("audio fetch failed: {e}")))?;
    if !response.status().is_success() {
        return Err(NarrationError::retryable(format!(
            "audio fetch returned {}",
            response.status()
        )));
    }
    response
        .bytes()
        .await
        .map_err(|e| NarrationError::retryable(format!("audio fetch body failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inline_payload_passes_bytes_through() {
        let http = reqwest::Client::new();
        let payload = ProviderPayload::Inline(Bytes::from_static(b"RIFF"));
        let bytes = payload.into_bytes(&http).await.unwrap();
        assert_eq!(&bytes[..], b"RIFF");
    }
}
