use crate::Credential;
use async_trait::async_trait;
use reqsign_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides static CMP credentials.
///
/// This provider is used when you have the access key and secret directly
/// and want to use them without any dynamic loading.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    access_key: String,
    secret: String,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with access key and secret.
    pub fn new(access_key: &str, secret: &str) -> Self {
        Self {
            access_key: access_key.to_string(),
            secret: secret.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(Credential::new(&self.access_key, &self.secret)))
    }
}
