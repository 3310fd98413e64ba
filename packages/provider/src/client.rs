//! HTTP client for the speech provider's synthesis endpoint.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use bytes::Bytes;
use lector_domain::{Exaggeration, NarrationError, VoiceReference};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credentials::CredentialResolver;
use crate::payload::ProviderPayload;

const APPLICATION_JSON: &str = "application/json";

/// One synthesis call's JSON body.
#[derive(Debug, Serialize)]
struct SynthesisBody<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_reference_url: Option<&'a str>,
    exaggeration: f32,
}

/// JSON response body when the provider does not stream raw audio.
#[derive(Debug, Deserialize)]
struct SynthesisJson {
    audio_base64: Option<String>,
    audio_url: Option<String>,
}

/// Client for the provider's synthesis API.
///
/// Credentials are obtained through the injected resolver on every call;
/// an authentication rejection invalidates the resolver before the error
/// propagates, so a later request re-resolves.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    resolver: Arc<dyn CredentialResolver>,
}

impl ProviderClient {
    /// Build a client around the given credential resolver.
    ///
    /// `call_timeout` bounds each HTTP request, provider cold starts
    /// included.
    pub fn new(
        resolver: Arc<dyn CredentialResolver>,
        call_timeout: Duration,
    ) -> Result<Self, NarrationError> {
        let http = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| NarrationError::Configuration(format!("http client: {e}")))?;
        Ok(Self { http, resolver })
    }

    /// The underlying HTTP client, shared with payload conversion.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Synthesize one chunk of text, returning the provider's payload in
    /// whichever shape it arrived.
    pub async fn synthesize(
        &self,
        text: &str,
        voice: &VoiceReference,
        exaggeration: Exaggeration,
    ) -> Result<ProviderPayload, NarrationError> {
        let creds = self.resolver.resolve().await?;

        let (voice_id, audio_reference_url) = match voice {
            VoiceReference::Preset(id) => (Some(id.as_str()), None),
            VoiceReference::SampleUrl(url) => (None, Some(url.as_str())),
        };
        let body = SynthesisBody {
            text,
            voice_id,
            audio_reference_url,
            exaggeration: exaggeration.value(),
        };

        debug!(chars = text.chars().count(), "synthesis call");

        let response = self
            .http
            .post(format!("{}/synthesize", creds.endpoint.trim_end_matches('/')))
            .bearer_auth(&creds.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
                self.resolver.invalidate().await;
            }
            return Err(classify_status(status, detail));
        }

        select_payload(response).await
    }
}

/// Map a transport-level failure into the retry taxonomy.
///
/// Timeouts and connection errors are transient; anything the provider
/// never saw cannot be a hard rejection.
fn classify_transport_error(error: reqwest::Error) -> NarrationError {
    if error.is_timeout() {
        NarrationError::retryable(format!("provider call timed out: {error}"))
    } else {
        NarrationError::retryable(format!("provider unreachable: {error}"))
    }
}

/// Map a non-success HTTP status into the fatal/retryable taxonomy.
fn classify_status(status: StatusCode, detail: String) -> NarrationError {
    let detail = if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            NarrationError::FatalProvider(format!("authentication failed: {detail}"))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            NarrationError::FatalProvider(format!("request rejected: {detail}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            NarrationError::rate_limited(format!("rate limited: {detail}"))
        }
        _ => NarrationError::retryable(detail),
    }
}

/// Pick the payload variant from a successful response.
///
/// A JSON body carries either inline base64 audio or a fetchable URL;
/// anything else is treated as a raw binary audio body.
async fn select_payload(response: reqwest::Response) -> Result<ProviderPayload, NarrationError> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(APPLICATION_JSON));

    if !is_json {
        return Ok(ProviderPayload::Stream(response));
    }

    let body: SynthesisJson = response
        .json()
        .await
        .map_err(|e| NarrationError::retryable(format!("provider response body: {e}")))?;

    if let Some(encoded) = body.audio_base64 {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| NarrationError::AudioProcessing(format!("inline audio decode: {e}")))?;
        return Ok(ProviderPayload::Inline(Bytes::from(bytes)));
    }
    if let Some(url) = body.audio_url {
        return Ok(ProviderPayload::Remote(url));
    }
    Err(NarrationError::AudioProcessing(
        "provider response carried no audio".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_bad_request_are_fatal() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            NarrationError::FatalProvider(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "bad voice".into()),
            NarrationError::FatalProvider(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNPROCESSABLE_ENTITY, String::new()),
            NarrationError::FatalProvider(_)
        ));
    }

    #[test]
    fn rate_limit_is_retryable_and_flagged() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, String::new());
        assert!(err.is_retryable());
        assert!(err.is_rate_limited());
    }

    #[test]
    fn server_errors_are_retryable_but_not_rate_limited() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "oops".into());
        assert!(err.is_retryable());
        assert!(!err.is_rate_limited());

        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE, String::new());
        assert!(err.is_retryable());
    }
}
