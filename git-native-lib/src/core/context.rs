//! Request-scoped state.

use crate::git::{UserCredential, BASIC_PROVIDER_ID};

/// State belonging to a single request, threaded explicitly into every
/// connection operation. Credentials stored here are visible only to
/// connections created with this context, so concurrent requests never
/// observe each other's credentials.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    user_id: Option<String>,
    basic_credential: Option<UserCredential>,
}

impl RequestContext {
    /// A context with no authenticated user and no credentials.
    pub fn anonymous() -> Self {
        Default::default()
    }

    /// Set the id of the authenticated user making the request.
    pub fn with_user_id(self, user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..self
        }
    }

    /// Attach a username/secret pair for the basic credentials provider.
    pub fn with_basic_credential(
        self,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            basic_credential: Some(UserCredential {
                username: username.into(),
                secret: secret.into(),
                provider_id: BASIC_PROVIDER_ID.to_string(),
            }),
            ..self
        }
    }

    /// The id of the authenticated user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The basic credential attached to this request, if any.
    pub fn basic_credential(&self) -> Option<&UserCredential> {
        self.basic_credential.as_ref()
    }
}
