use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::sync::{Arc, Mutex};

use regex::Regex;
use tracing::{instrument, warn};

use crate::core::config::{
    COMMITTER_EMAIL_PREFERENCE, COMMITTER_NAME_PREFERENCE, COMMITTER_PREFERENCE_PATTERN,
};
use crate::core::context::RequestContext;

/// Name used when no identity could be resolved.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Email used when no identity could be resolved.
pub const ANONYMOUS_EMAIL: &str = "anonymous@noemail.com";

/// A name and email pair identifying who makes commits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GitUser {
    /// The user's name.
    pub name: String,

    /// The user's email.
    pub email: String,
}

impl GitUser {
    /// Construct a user.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// The identity used when nothing better is known.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_NAME, ANONYMOUS_EMAIL)
    }
}

impl Default for GitUser {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Display for GitUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Determines the identity acting on behalf of a request.
pub trait UserResolver: Debug + Send + Sync {
    /// Resolve the identity for `ctx`. Never fails: implementations fall back
    /// to [`GitUser::anonymous`].
    fn resolve(&self, ctx: &RequestContext) -> GitUser;
}

/// Per-user preference storage.
pub trait PreferenceStore: Debug + Send + Sync {
    /// All preferences of `user_id` whose keys match the regular expression
    /// `key_pattern`.
    fn get_preferences(
        &self,
        user_id: &str,
        key_pattern: &str,
    ) -> eyre::Result<HashMap<String, String>>;
}

/// A [`PreferenceStore`] held in memory.
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    preferences: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryPreferenceStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the preference `key` of `user_id`.
    pub fn set(&self, user_id: &str, key: &str, value: &str) {
        let mut preferences = match self.preferences.lock() {
            Ok(preferences) => preferences,
            Err(poisoned) => poisoned.into_inner(),
        };
        preferences
            .entry(user_id.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get_preferences(
        &self,
        user_id: &str,
        key_pattern: &str,
    ) -> eyre::Result<HashMap<String, String>> {
        let pattern = Regex::new(key_pattern)?;
        let preferences = match self.preferences.lock() {
            Ok(preferences) => preferences,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(preferences
            .get(user_id)
            .map(|user_preferences| {
                user_preferences
                    .iter()
                    .filter(|(key, _)| pattern.is_match(key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Resolves the acting identity from the `git.committer.name` and
/// `git.committer.email` preferences of the request's user.
#[derive(Clone, Debug)]
pub struct LocalUserResolver {
    preference_store: Arc<dyn PreferenceStore>,
}

impl LocalUserResolver {
    /// Construct a resolver reading from `preference_store`.
    pub fn new(preference_store: Arc<dyn PreferenceStore>) -> Self {
        Self { preference_store }
    }
}

impl UserResolver for LocalUserResolver {
    #[instrument]
    fn resolve(&self, ctx: &RequestContext) -> GitUser {
        let user_id = match ctx.user_id() {
            Some(user_id) => user_id,
            None => {
                warn!("No authenticated user; using anonymous committer");
                return GitUser::anonymous();
            }
        };
        let preferences = match self
            .preference_store
            .get_preferences(user_id, COMMITTER_PREFERENCE_PATTERN)
        {
            Ok(preferences) => preferences,
            Err(err) => {
                warn!(?user_id, ?err, "Could not read committer preferences");
                return GitUser::anonymous();
            }
        };

        let name = preferences
            .get(COMMITTER_NAME_PREFERENCE)
            .filter(|name| !name.is_empty())
            .cloned()
            .unwrap_or_else(|| ANONYMOUS_NAME.to_owned());
        let email = preferences
            .get(COMMITTER_EMAIL_PREFERENCE)
            .filter(|email| !email.is_empty())
            .cloned()
            .unwrap_or_else(|| ANONYMOUS_EMAIL.to_owned());
        GitUser { name, email }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FailingPreferenceStore;

    impl PreferenceStore for FailingPreferenceStore {
        fn get_preferences(
            &self,
            _user_id: &str,
            _key_pattern: &str,
        ) -> eyre::Result<HashMap<String, String>> {
            eyre::bail!("preference service unavailable")
        }
    }

    #[test]
    fn test_resolve_from_preferences() {
        let store = InMemoryPreferenceStore::new();
        store.set("alice", COMMITTER_NAME_PREFERENCE, "Alice");
        store.set("alice", COMMITTER_EMAIL_PREFERENCE, "alice@example.com");
        store.set("alice", "editor.theme", "dark");
        let resolver = LocalUserResolver::new(Arc::new(store));

        let ctx = RequestContext::anonymous().with_user_id("alice");
        assert_eq!(
            resolver.resolve(&ctx),
            GitUser::new("Alice", "alice@example.com")
        );
    }

    #[test]
    fn test_resolve_partial_preferences() {
        let store = InMemoryPreferenceStore::new();
        store.set("bob", COMMITTER_NAME_PREFERENCE, "Bob");
        let resolver = LocalUserResolver::new(Arc::new(store));

        let ctx = RequestContext::anonymous().with_user_id("bob");
        assert_eq!(resolver.resolve(&ctx), GitUser::new("Bob", ANONYMOUS_EMAIL));
    }

    #[test]
    fn test_resolve_without_user() {
        let resolver = LocalUserResolver::new(Arc::new(InMemoryPreferenceStore::new()));
        assert_eq!(
            resolver.resolve(&RequestContext::anonymous()),
            GitUser::anonymous()
        );
    }

    #[test]
    fn test_resolve_with_failing_store() {
        let resolver = LocalUserResolver::new(Arc::new(FailingPreferenceStore));
        let ctx = RequestContext::anonymous().with_user_id("alice");
        assert_eq!(resolver.resolve(&ctx), GitUser::anonymous());
    }

    #[test]
    fn test_display() {
        insta::assert_snapshot!(GitUser::anonymous(), @"Anonymous <anonymous@noemail.com>");
    }
}
