use async_trait::async_trait;
use reqsign_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::credential::Credential;

/// ConfigCredentialProvider will load credential from config.
///
/// Values missing from the config are looked up in the environment.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new loader via config.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let config = self.config.as_ref().clone().from_env(ctx);
        let access_key = config.access_key.filter(|v| !v.is_empty());
        let secret = config.secret.filter(|v| !v.is_empty());

        match (access_key, secret) {
            (Some(ak), Some(sk)) => Ok(Some(Credential::new(ak, sk))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use reqsign_core::OsEnv;

    #[test]
    fn test_credential_config_loader_with_env() {
        let _ = env_logger::builder().is_test(true).try_init();

        temp_env::with_vars(
            vec![
                (CMP_ACCESS_KEY, Some("access_key")),
                (CMP_SECRET, Some("secret")),
            ],
            || {
                tokio::runtime::Runtime::new().unwrap().block_on(async {
                    let ctx = Context::new().with_env(OsEnv);
                    let loader = ConfigCredentialProvider::new(Arc::new(Config::default()));

                    let x = loader
                        .provide_credential(&ctx)
                        .await
                        .expect("load must succeed");
                    let x = x.expect("must load succeed");
                    assert_eq!("access_key", x.access_key);
                    assert_eq!("secret", x.secret);
                })
            },
        );
    }

    #[tokio::test]
    async fn test_credential_config_loader_prefers_config() {
        let config = Config::new()
            .with_access_key("config_access_key")
            .with_secret("config_secret");
        let loader = ConfigCredentialProvider::new(Arc::new(config));

        let cred = loader
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key, "config_access_key");
        assert_eq!(cred.secret, "config_secret");
    }

    #[tokio::test]
    async fn test_credential_config_loader_skips_empty_values() {
        let config = Config::new().with_access_key("").with_secret("config_secret");
        let loader = ConfigCredentialProvider::new(Arc::new(config));

        let cred = loader.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }
}
