use crate::{Context, ProvideCredential, Result};
use log::debug;
use std::fmt::{Debug, Formatter};

/// ProvideCredentialChain tries a list of credential providers in order.
///
/// The first provider that returns `Some` wins. A provider returning `None`
/// hands over to the next one, an error stops the chain immediately.
///
/// ```
/// use reqsign_core::ProvideCredentialChain;
/// # #[derive(Clone, Debug)]
/// # struct Credential;
///
/// let chain = ProvideCredentialChain::<Credential>::new();
/// assert!(chain.is_empty());
/// ```
pub struct ProvideCredentialChain<C> {
    providers: Vec<Box<dyn ProvideCredential<Credential = C>>>,
}

impl<C> Default for ProvideCredentialChain<C> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<C> Debug for ProvideCredentialChain<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers", &self.providers)
            .finish()
    }
}

impl<C: Send + Sync + Unpin + 'static> ProvideCredentialChain<C> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to the end of the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Insert a provider at the front of the chain.
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.insert(0, Box::new(provider));
        self
    }

    /// Number of providers in this chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider has been added.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait::async_trait]
impl<C: Send + Sync + Unpin + 'static> ProvideCredential for ProvideCredentialChain<C> {
    type Credential = C;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            debug!("trying credential provider: {provider:?}");

            if let Some(cred) = provider.provide_credential(ctx).await? {
                return Ok(Some(cred));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Fixed {
        value: Option<&'static str>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn new(value: Option<&'static str>, calls: &Arc<AtomicUsize>) -> Self {
            Self {
                value,
                fail: false,
                calls: calls.clone(),
            }
        }

        fn failing(calls: &Arc<AtomicUsize>) -> Self {
            Self {
                value: None,
                fail: true,
                calls: calls.clone(),
            }
        }
    }

    #[async_trait::async_trait]
    impl ProvideCredential for Fixed {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::credential_invalid("broken source"));
            }
            Ok(self.value.map(str::to_string))
        }
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_success() {
        let ctx = Context::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));

        let chain = ProvideCredentialChain::new()
            .push(Fixed::new(None, &first))
            .push(Fixed::new(Some("second"), &second))
            .push(Fixed::new(Some("third"), &third));

        let cred = chain.provide_credential(&ctx).await.unwrap();
        assert_eq!(cred.as_deref(), Some("second"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chain_push_front() {
        let ctx = Context::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let chain = ProvideCredentialChain::new()
            .push(Fixed::new(Some("back"), &calls))
            .push_front(Fixed::new(Some("front"), &calls));

        assert_eq!(chain.len(), 2);
        let cred = chain.provide_credential(&ctx).await.unwrap();
        assert_eq!(cred.as_deref(), Some("front"));
    }

    #[tokio::test]
    async fn test_chain_propagates_error() {
        let ctx = Context::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let chain = ProvideCredentialChain::new()
            .push(Fixed::failing(&calls))
            .push(Fixed::new(Some("unreachable"), &calls));

        let err = chain.provide_credential(&ctx).await.unwrap_err();
        assert!(err.is_credential_error());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain = ProvideCredentialChain::<String>::new();
        assert!(chain
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .is_none());
    }
}
