//! Reqwest-based HTTP client implementation for reqsign.
//!
//! `ReqwestHttpSend` plugs a [`reqwest::Client`] into [`reqsign_core::Context`].
//!
//! ```no_run
//! use reqsign_core::Context;
//! use reqsign_http_send_reqwest::ReqwestHttpSend;
//! use std::time::Duration;
//!
//! # fn main() -> reqsign_core::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::with_timeout(Duration::from_secs(10))?);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use log::debug;
use reqsign_core::{Error, HttpSend, Result};
use reqwest::{Client, Request};

/// HttpSend implementation backed by `reqwest`.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a new ReqwestHttpSend whose requests fail after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config_invalid("failed to build http client").with_source(e))?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        debug!("sending {} {}", req.method(), req.uri());

        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert http request").with_source(e))?;
        let resp = self.client.execute(req).await.map_err(|e| {
            let message = if e.is_timeout() {
                "http request timed out"
            } else {
                "failed to send http request"
            };
            Error::unexpected(message).with_source(e)
        })?;
        let resp: http::Response<_> = resp.into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqsign_core::{Context, ErrorKind};

    #[tokio::test]
    async fn test_connection_failure_is_unexpected() {
        let ctx = Context::new().with_http_send(
            ReqwestHttpSend::with_timeout(Duration::from_secs(2)).expect("client must build"),
        );

        // Port 1 is reserved and nothing listens on it.
        let req = http::Request::post("http://127.0.0.1:1/api/v1/external/oauth/token")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let err = ctx.http_send(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
