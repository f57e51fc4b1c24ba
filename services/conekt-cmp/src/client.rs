use std::fmt::{Display, Formatter};

use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Method, Request, StatusCode};
use log::{debug, error};
use reqsign_core::{Error, Result, Signer};
use serde::Serialize;
use serde_json::Value;

use crate::constants::*;
use crate::credential::Credential;
use crate::token::{extract_token, TokenRequest};

/// Body of `POST /api/v1/external/device/sim/details`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimDetailsRequest<'a> {
    /// EIDs of the devices to look up.
    pub eid_list: Vec<&'a str>,
}

/// Response of the SIM details call.
#[derive(Debug)]
pub struct SimDetails {
    /// HTTP status returned by CMP.
    pub status: StatusCode,
    /// Response payload.
    pub body: ResponseBody,
}

/// A response payload, parsed as JSON when possible.
#[derive(Debug, PartialEq)]
pub enum ResponseBody {
    /// The response was valid JSON.
    Json(Value),
    /// The response was not JSON, kept as received.
    Text(String),
}

impl ResponseBody {
    fn from_bytes(bs: &[u8]) -> Self {
        match serde_json::from_slice(bs) {
            Ok(v) => ResponseBody::Json(v),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bs).to_string()),
        }
    }
}

impl Display for ResponseBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Json(v) => match serde_json::to_string_pretty(v) {
                Ok(s) => f.write_str(&s),
                Err(_) => write!(f, "{v}"),
            },
            ResponseBody::Text(s) => f.write_str(s),
        }
    }
}

impl Display for SimDetails {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SIM details status: {}", self.status.as_u16())?;
        write!(f, "{}", self.body)
    }
}

/// Client for the CMP external API.
///
/// Each call serializes its body once, signs those bytes and sends them
/// unchanged.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: String,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a client for `endpoint`, e.g. `https://cmp.conekt.ai`.
    pub fn new(endpoint: &str, signer: Signer<Credential>) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            signer,
        }
    }

    /// Request an access token.
    ///
    /// The access key and secret are sent as `clientId` and `clientSecret`.
    pub async fn fetch_token(&self) -> Result<String> {
        let cred = self
            .signer
            .credential()
            .await?
            .ok_or_else(|| Error::config_invalid("no cmp credential could be loaded"))?;

        let body = serde_json::to_vec(&TokenRequest {
            client_id: &cred.access_key,
            client_secret: &cred.secret,
        })
        .map_err(|e| Error::unexpected("failed to serialize token request").with_source(e))?;

        let url = format!("{}{}", self.endpoint, TOKEN_PATH);
        let resp = self.send(&url, body, None).await?;

        let status = resp.status();
        if !status.is_success() {
            error!("token request to {url} failed: {status}");
            let message = format!(
                "token request failed: HTTP {} - {}",
                status.as_u16(),
                String::from_utf8_lossy(resp.body())
            );
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::credential_denied(message)
                }
                _ => Error::unexpected(message),
            });
        }

        let data: Value = serde_json::from_slice(resp.body())
            .map_err(|e| Error::unexpected("failed to parse token response").with_source(e))?;
        debug!("raw token response: {data}");

        extract_token(&data)
    }

    /// Fetch SIM details for the given EIDs.
    ///
    /// Non-success statuses are returned to the caller, not turned into
    /// errors.
    pub async fn sim_details<S: AsRef<str>>(
        &self,
        token: &str,
        eids: &[S],
    ) -> Result<SimDetails> {
        let body = serde_json::to_vec(&SimDetailsRequest {
            eid_list: eids.iter().map(|eid| eid.as_ref()).collect(),
        })
        .map_err(|e| {
            Error::unexpected("failed to serialize sim details request").with_source(e)
        })?;

        let url = format!("{}{}", self.endpoint, SIM_DETAILS_PATH);
        let resp = self.send(&url, body, Some(token)).await?;

        Ok(SimDetails {
            status: resp.status(),
            body: ResponseBody::from_bytes(resp.body()),
        })
    }

    async fn send(
        &self,
        url: &str,
        body: Vec<u8>,
        token: Option<&str>,
    ) -> Result<http::Response<Bytes>> {
        let (mut parts, ()) = Request::builder()
            .method(Method::POST)
            .uri(url)
            .body(())?
            .into_parts();

        if let Some(token) = token {
            let mut value: HeaderValue = format!("Bearer {token}").parse()?;
            value.set_sensitive(true);
            parts.headers.insert(AUTHORIZATION, value);
        }

        self.signer.sign(&mut parts, &body).await?;

        let req = Request::from_parts(parts, Bytes::from(body));
        self.signer.context().http_send(req).await
    }
}
