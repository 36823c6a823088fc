use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::core::context::RequestContext;
use crate::git::{Error, GitUser, Result};

/// Id of [`BasicCredentialsProvider`].
pub const BASIC_PROVIDER_ID: &str = "git-basic";

/// A username and secret used to authenticate against a remote.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    /// The username.
    pub username: String,

    /// The password or token. Never logged.
    pub secret: String,

    /// The id of the provider which supplied this credential.
    pub provider_id: String,
}

impl Debug for UserCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<UserCredential username={:?} provider_id={:?} secret=not shown>",
            self.username, self.provider_id
        )
    }
}

/// A source of credentials for remote repositories, such as an OAuth
/// integration for one hosting service.
pub trait CredentialsProvider: Debug + Send + Sync {
    /// A stable id for this provider. Recorded in the repository's
    /// configuration after it is used successfully.
    fn id(&self) -> &str;

    /// Whether this provider is responsible for `url`.
    fn can_provide_credentials(&self, url: &str, ctx: &RequestContext) -> bool;

    /// The credential to use for the current request, if one is available.
    fn get_user_credential(&self, ctx: &RequestContext) -> eyre::Result<Option<UserCredential>>;

    /// The identity to commit as when this provider was last used in a
    /// repository, if the provider knows one.
    fn get_user(&self, ctx: &RequestContext) -> eyre::Result<Option<GitUser>>;
}

/// Selects a [`CredentialsProvider`] for a remote URL.
///
/// Providers are consulted in registration order and the first one which
/// claims the URL wins.
#[derive(Clone, Debug, Default)]
pub struct CredentialsLoader {
    providers: Vec<Arc<dyn CredentialsProvider>>,
}

impl CredentialsLoader {
    /// Construct a loader over `providers`.
    pub fn new(providers: Vec<Arc<dyn CredentialsProvider>>) -> Self {
        Self { providers }
    }

    /// Register another provider, consulted after all existing ones.
    pub fn register(&mut self, provider: Arc<dyn CredentialsProvider>) {
        self.providers.push(provider);
    }

    fn provider(&self, provider_id: &str) -> Option<&Arc<dyn CredentialsProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.id() == provider_id)
    }

    /// Get the credential for `url` from the first provider claiming it.
    ///
    /// Returns `Ok(None)` if no provider claims the URL or the claiming
    /// provider has no credential for this request.
    #[instrument]
    pub fn get_user_credential(
        &self,
        url: &str,
        ctx: &RequestContext,
    ) -> Result<Option<UserCredential>> {
        let provider = match self
            .providers
            .iter()
            .find(|provider| provider.can_provide_credentials(url, ctx))
        {
            Some(provider) => provider,
            None => {
                debug!(?url, "No credentials provider for URL");
                return Ok(None);
            }
        };

        let credential = provider
            .get_user_credential(ctx)
            .map_err(|err| Error::CredentialsProvider {
                provider_id: provider.id().to_owned(),
                message: format!("{err:#}"),
            })?;
        match credential {
            Some(credential) if credential.provider_id != provider.id() => {
                Err(Error::CredentialsProviderMismatch {
                    expected: provider.id().to_owned(),
                    actual: credential.provider_id,
                })
            }
            credential => Ok(credential),
        }
    }

    /// Get the identity known to the provider with id `provider_id`.
    ///
    /// Returns `Ok(None)` for an unknown provider id.
    #[instrument]
    pub fn get_user(&self, provider_id: &str, ctx: &RequestContext) -> Result<Option<GitUser>> {
        let provider = match self.provider(provider_id) {
            Some(provider) => provider,
            None => {
                debug!(?provider_id, "Unknown credentials provider");
                return Ok(None);
            }
        };
        provider
            .get_user(ctx)
            .map_err(|err| Error::CredentialsProvider {
                provider_id: provider_id.to_owned(),
                message: format!("{err:#}"),
            })
    }
}

/// Supplies the username and secret attached to the request with
/// [`RequestContext::with_basic_credential`], for any URL.
#[derive(Clone, Debug, Default)]
pub struct BasicCredentialsProvider;

impl CredentialsProvider for BasicCredentialsProvider {
    fn id(&self) -> &str {
        BASIC_PROVIDER_ID
    }

    fn can_provide_credentials(&self, _url: &str, ctx: &RequestContext) -> bool {
        ctx.basic_credential().is_some()
    }

    fn get_user_credential(&self, ctx: &RequestContext) -> eyre::Result<Option<UserCredential>> {
        Ok(ctx.basic_credential().cloned())
    }

    fn get_user(&self, _ctx: &RequestContext) -> eyre::Result<Option<GitUser>> {
        Ok(None)
    }
}
