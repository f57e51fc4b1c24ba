use reqsign_core::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Body of `POST /api/v1/external/oauth/token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest<'a> {
    /// OAuth client id, the CMP access key.
    pub client_id: &'a str,
    /// OAuth client secret, the CMP secret.
    pub client_secret: &'a str,
}

/// Locate the access token in a token response.
///
/// Looks at `obj.token`, `obj.accessToken`, `token` and `accessToken`, in
/// that order, and takes the first non-empty string.
pub fn extract_token(resp: &Value) -> Result<String> {
    let nested = resp
        .get("obj")
        .into_iter()
        .flat_map(|obj| [obj.get("token"), obj.get("accessToken")]);
    let top = [resp.get("token"), resp.get("accessToken")];

    let token = nested
        .chain(top)
        .flatten()
        .filter_map(Value::as_str)
        .find(|v| !v.is_empty());

    match token {
        Some(token) => Ok(token.to_string()),
        None => Err(Error::unexpected(format!(
            "could not find token in response. success={} status={} msg={}",
            diagnostic(resp, &["success"]),
            diagnostic(resp, &["status"]),
            diagnostic(resp, &["msg", "message"]),
        ))),
    }
}

/// Render the first present field for the error message, `None` if absent.
fn diagnostic(resp: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| resp.get(*k))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            v => v.to_string(),
        })
        .unwrap_or_else(|| "None".to_string())
}
