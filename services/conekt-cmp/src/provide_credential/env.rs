use crate::{constants::*, Credential};
use async_trait::async_trait;
use reqsign_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads CMP credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `CMP_ACCESS_KEY`: The CMP access key (client id)
/// - `CMP_SECRET`: The CMP secret (client secret)
///
/// Empty values are treated as absent.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key = ctx.env_var(CMP_ACCESS_KEY).filter(|v| !v.is_empty());
        let secret = ctx.env_var(CMP_SECRET).filter(|v| !v.is_empty());

        match (access_key, secret) {
            (Some(ak), Some(sk)) => Ok(Some(Credential::new(ak, sk))),
            _ => Ok(None),
        }
    }
}
