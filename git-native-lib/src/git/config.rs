use tracing::instrument;

use crate::git::commands::{
    ConfigGetCommand, ConfigListCommand, ConfigSetCommand, ConfigUnsetCommand,
};
use crate::git::{NativeGit, Result};

/// Wrapper around the configuration of a repository, as seen by `git config`.
///
/// Reads see every configuration level; writes go to the repository's local
/// configuration.
#[derive(Debug)]
pub struct Config<'a> {
    native_git: &'a NativeGit,
}

impl<'a> Config<'a> {
    pub(crate) fn new(native_git: &'a NativeGit) -> Self {
        Self { native_git }
    }

    /// Get the value of `key`, or `None` if it is not set.
    #[instrument]
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.native_git.execute(&ConfigGetCommand {
            key: key.to_owned(),
            all: false,
        })?;
        Ok(values.into_iter().last())
    }

    /// Get the value of `key`, or `default` if it is not set.
    pub fn get_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_owned()))
    }

    /// Get every value of a multi-valued key.
    #[instrument]
    pub fn get_all(&self, key: &str) -> Result<Vec<String>> {
        self.native_git.execute(&ConfigGetCommand {
            key: key.to_owned(),
            all: true,
        })
    }

    /// Set `key` to `value`, replacing any existing value.
    #[instrument]
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.native_git.execute(&ConfigSetCommand {
            key: key.to_owned(),
            value: value.to_owned(),
            add: false,
        })
    }

    /// Add `value` to the values of the multi-valued key `key`.
    #[instrument]
    pub fn add(&self, key: &str, value: &str) -> Result<()> {
        self.native_git.execute(&ConfigSetCommand {
            key: key.to_owned(),
            value: value.to_owned(),
            add: true,
        })
    }

    /// Remove every value of `key`. Does nothing if it is not set.
    #[instrument]
    pub fn unset(&self, key: &str) -> Result<()> {
        self.native_git.execute(&ConfigUnsetCommand {
            key: key.to_owned(),
        })
    }

    /// Every key and value.
    #[instrument]
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        self.native_git.execute(&ConfigListCommand)
    }
}
