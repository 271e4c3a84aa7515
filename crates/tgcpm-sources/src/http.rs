//! Request plumbing shared by every provider client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, Url};

use crate::error::SourceError;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses `base_url` and guarantees exactly one trailing slash, so that
/// [`Url::join`] appends to the path instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, SourceError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| SourceError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, SourceError> {
    base.join(path).map_err(|e| SourceError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Sends the request and parses the body as JSON.
///
/// A 404 is reported as `Ok(None)` ("unknown channel"), any other non-2xx
/// status as [`SourceError::UnexpectedStatus`]. `context` is used in errors
/// instead of the URL, and transport errors are stripped of theirs, because
/// some providers carry credentials in the path.
pub(crate) async fn get_json(
    request: RequestBuilder,
    context: &str,
) -> Result<Option<serde_json::Value>, SourceError> {
    let response = request.send().await.map_err(reqwest::Error::without_url)?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: context.to_string(),
        });
    }
    let body = response
        .text()
        .await
        .map_err(reqwest::Error::without_url)?;
    let value = serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
        context: context.to_string(),
        source: e,
    })?;
    Ok(Some(value))
}

/// Unwraps the `{ "ok": true, "result": ... }` envelope used by the
/// messaging-platform lookup and the aggregator.
pub(crate) fn unwrap_ok_envelope(
    body: serde_json::Value,
    context: &str,
) -> Result<serde_json::Value, SourceError> {
    let ok = body
        .get("ok")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);
    if !ok {
        let msg = body
            .get("description")
            .or_else(|| body.get("error"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown error");
        return Err(SourceError::Api(format!("{context}: {msg}")));
    }
    Ok(body
        .get("result")
        .cloned()
        .unwrap_or(serde_json::Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_keeps_path_prefix() {
        let base = parse_base_url("https://api.example.com/v1").unwrap();
        let url = endpoint(&base, "channel/info").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/channel/info");
    }

    #[test]
    fn parse_base_url_collapses_trailing_slashes() {
        let base = parse_base_url("https://api.example.com/v1//").unwrap();
        assert_eq!(base.as_str(), "https://api.example.com/v1/");
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, SourceError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn unwrap_ok_envelope_returns_result() {
        let body = serde_json::json!({ "ok": true, "result": { "title": "x" } });
        let result = unwrap_ok_envelope(body, "test").unwrap();
        assert_eq!(result["title"], "x");
    }

    #[test]
    fn unwrap_ok_envelope_surfaces_description() {
        let body = serde_json::json!({ "ok": false, "description": "chat not found" });
        let err = unwrap_ok_envelope(body, "getChat").unwrap_err();
        assert!(
            matches!(err, SourceError::Api(ref m) if m.contains("chat not found")),
            "got {err:?}"
        );
    }
}
