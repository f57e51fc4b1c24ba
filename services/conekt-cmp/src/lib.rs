//! Signers and client for the Conekt CMP device-management API.
//!
//! Every call to CMP carries an HMAC-SHA256 signature over
//! `access_key + timestamp_ms + request_id + body`, see [`build_signature`].
//!
//! ```no_run
//! use reqsign_conekt_cmp::{Client, Config, DefaultCredentialProvider, RequestSigner};
//! use reqsign_core::{Context, OsEnv, Signer};
//! use reqsign_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> reqsign_core::Result<()> {
//! let ctx = Context::new()
//!     .with_http_send(ReqwestHttpSend::with_timeout(reqsign_conekt_cmp::DEFAULT_TIMEOUT)?)
//!     .with_env(OsEnv);
//! let config = Config::default().from_env(&ctx);
//! let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//! let client = Client::new(&config.endpoint(), signer);
//!
//! let token = client.fetch_token().await?;
//! let details = client.sim_details(&token, &["89033023321190000000025961688934"]).await?;
//! println!("{details}");
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::{build_signature, RequestSigner};

mod token;
pub use token::{extract_token, TokenRequest};

mod client;
pub use client::{Client, ResponseBody, SimDetails, SimDetailsRequest};

mod provide_credential;
pub use provide_credential::*;
