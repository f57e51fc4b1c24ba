//! Conekt CMP request signer
use http::header::CONTENT_TYPE;
use http::HeaderValue;
use log::debug;
use reqsign_core::hash::upper_hex_hmac_sha256;
use reqsign_core::time::{format_timestamp_millis, now, DateTime};
use reqsign_core::{Context, Error, Result, SignRequest, SigningCredential};

use super::constants::*;
use super::credential::Credential;

/// RequestSigner that implements the CMP external API authorization.
///
/// Every request gets a fresh millisecond timestamp and a UUID v4 request id,
/// both bound into the signature together with the access key and the body.
#[derive(Debug, Default)]
pub struct RequestSigner {
    time: Option<DateTime>,
    request_id: Option<String>,
}

impl RequestSigner {
    /// Create a signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the request id.
    ///
    /// # Note
    ///
    /// Reusing a request id lets the server reject the call as a replay.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        parts: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let k = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
        if !k.is_valid() {
            return Err(Error::credential_invalid(
                "access key and secret must not be empty",
            ));
        }

        let timestamp_ms = format_timestamp_millis(self.time.unwrap_or_else(now));
        let request_id = self
            .request_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let signature =
            build_signature(&k.access_key, &k.secret, &timestamp_ms, &request_id, body)?;

        let headers = &mut parts.headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.insert(SIGN_METHOD, HeaderValue::from_static(SIGN_METHOD_HMAC_SHA256));
        headers.insert(TIMESTAMP, timestamp_ms.parse()?);
        headers.insert(VERSION, HeaderValue::from_static(API_VERSION));
        headers.insert(SIGNATURE, {
            let mut value: HeaderValue = signature.parse()?;
            value.set_sensitive(true);

            value
        });
        headers.insert(REQUEST_ID, request_id.parse()?);
        headers.insert(ACCESS_KEY, k.access_key.parse()?);

        Ok(())
    }
}

/// Compute the CMP signature of a request.
///
/// ## Format
///
/// ```text
/// HexUpper(HMAC-SHA256(secret, access_key + timestamp_ms + request_id + body))
/// ```
///
/// The parts are concatenated without delimiters. `body` must be the exact
/// bytes put on the wire and must be valid UTF-8.
pub fn build_signature(
    access_key: &str,
    secret: &str,
    timestamp_ms: &str,
    request_id: &str,
    body: &[u8],
) -> Result<String> {
    let body = std::str::from_utf8(body)?;

    let size = access_key.len() + timestamp_ms.len() + request_id.len() + body.len();
    let mut s = String::with_capacity(size);
    s.push_str(access_key);
    s.push_str(timestamp_ms);
    s.push_str(request_id);
    s.push_str(body);
    debug!("string to sign for request {request_id}: {} bytes", s.len());

    Ok(upper_hex_hmac_sha256(secret.as_bytes(), s.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqsign_core::ErrorKind;
    use test_case::test_case;

    const KNOWN_SIGNATURE: &str =
        "58C131335DAFB008F570929246D5337D62EC79C5640DF4DF98CA208FACD392AA";

    #[test]
    fn test_known_vector() {
        let sig = build_signature("K", "S", "1700000000000", "R", b"{}").unwrap();
        assert_eq!(sig, KNOWN_SIGNATURE);
    }

    #[test]
    fn test_signature_is_deterministic() {
        let a = build_signature("ak", "sk", "1700000000000", "req", br#"{"a":1}"#).unwrap();
        let b = build_signature("ak", "sk", "1700000000000", "req", br#"{"a":1}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_is_upper_hex() {
        let sig = build_signature(
            "access",
            "ключ",
            "1700000000000",
            "0b5e3c3e-5d0e-4a8a-9a43-1d1c0b5a7e21",
            "{\"name\":\"café\"}".as_bytes(),
        )
        .unwrap();

        assert_eq!(sig.len(), 64);
        assert!(sig
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test_case("k", "S", "1700000000000", "R", b"{}"; "access key")]
    #[test_case("K", "s", "1700000000000", "R", b"{}"; "secret")]
    #[test_case("K", "S", "1700000000001", "R", b"{}"; "timestamp")]
    #[test_case("K", "S", "1700000000000", "r", b"{}"; "request id")]
    #[test_case("K", "S", "1700000000000", "R", b"{ }"; "body")]
    fn test_any_input_change_alters_signature(
        access_key: &str,
        secret: &str,
        timestamp_ms: &str,
        request_id: &str,
        body: &[u8],
    ) {
        let sig = build_signature(access_key, secret, timestamp_ms, request_id, body).unwrap();
        assert_ne!(sig, KNOWN_SIGNATURE);
    }

    #[test]
    fn test_invalid_utf8_body_is_rejected() {
        let err = build_signature("K", "S", "1700000000000", "R", &[b'{', 0xff, b'}']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[tokio::test]
    async fn test_sign_request_headers() -> anyhow::Result<()> {
        let signer = RequestSigner::new()
            .with_time(DateTime::from_timestamp_millis(1_700_000_000_000).unwrap())
            .with_request_id("R");
        let cred = Credential::new("K", "S");

        let mut parts = http::Request::post("https://cmp.example.com/api/v1/external/oauth/token")
            .body(())?
            .into_parts()
            .0;
        signer
            .sign_request(&Context::new(), &mut parts, b"{}", Some(&cred))
            .await?;

        let h = &parts.headers;
        assert_eq!(h[CONTENT_TYPE], "application/json");
        assert_eq!(h["Sign-Method"], "HMAC-SHA256");
        assert_eq!(h["Timestamp"], "1700000000000");
        assert_eq!(h["Version"], "1.0");
        assert_eq!(h["Signature"], KNOWN_SIGNATURE);
        assert!(h["Signature"].is_sensitive());
        assert_eq!(h["Request-ID"], "R");
        assert_eq!(h["Access-Key"], "K");
        assert!(h.get(http::header::AUTHORIZATION).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_request_keeps_authorization() -> anyhow::Result<()> {
        let signer = RequestSigner::new();
        let cred = Credential::new("K", "S");

        let mut parts = http::Request::post("https://cmp.example.com/")
            .header(http::header::AUTHORIZATION, "Bearer abc")
            .body(())?
            .into_parts()
            .0;
        signer
            .sign_request(&Context::new(), &mut parts, b"{}", Some(&cred))
            .await?;

        assert_eq!(parts.headers[http::header::AUTHORIZATION], "Bearer abc");
        let request_id = parts.headers["Request-ID"].to_str()?;
        assert!(uuid::Uuid::parse_str(request_id).is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_request_fresh_request_id() -> anyhow::Result<()> {
        let signer = RequestSigner::new();
        let cred = Credential::new("K", "S");
        let mut ids = Vec::new();

        for _ in 0..2 {
            let mut parts = http::Request::post("https://cmp.example.com/")
                .body(())?
                .into_parts()
                .0;
            signer
                .sign_request(&Context::new(), &mut parts, b"{}", Some(&cred))
                .await?;
            ids.push(parts.headers["Request-ID"].to_str()?.to_string());
        }

        assert_ne!(ids[0], ids[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_request_without_credential() {
        let mut parts = http::Request::post("https://cmp.example.com/")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let err = RequestSigner::new()
            .sign_request(&Context::new(), &mut parts, b"{}", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test_case("", "S"; "empty access key")]
    #[test_case("K", ""; "empty secret")]
    #[tokio::test]
    async fn test_sign_request_rejects_empty_credential(access_key: &str, secret: &str) {
        let mut parts = http::Request::post("https://cmp.example.com/")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let cred = Credential::new(access_key, secret);

        let err = RequestSigner::new()
            .sign_request(&Context::new(), &mut parts, b"{}", Some(&cred))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
        assert!(parts.headers.get("Signature").is_none());
    }
}
