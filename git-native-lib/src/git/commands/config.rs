use super::GitCommand;
use crate::git::{Error, GitRunResult, Result};

fn config_failed(args: Vec<String>, result: &GitRunResult) -> Error {
    Error::GitFailed {
        args,
        exit_code: result.exit_code,
        message: result.failure_message(),
    }
}

/// `git config --get <key>`, or `--get-all`.
///
/// A missing key is not an error: it yields no values.
#[derive(Clone, Debug)]
pub struct ConfigGetCommand {
    /// The key to look up, like `user.name`.
    pub key: String,

    /// Return every value of a multi-valued key rather than the last one.
    pub all: bool,
}

impl GitCommand for ConfigGetCommand {
    type Output = Vec<String>;

    fn args(&self) -> Vec<String> {
        vec![
            "config".to_string(),
            if self.all { "--get-all" } else { "--get" }.to_string(),
            self.key.clone(),
        ]
    }

    fn treat_failure_as_error(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<String>> {
        match result.exit_code.0 {
            0 => Ok(result
                .stdout_text()?
                .lines()
                .map(|line| line.to_owned())
                .collect()),
            1 => Ok(Vec::new()),
            _ => Err(config_failed(self.args(), &result)),
        }
    }
}

/// `git config --list -z`: every configured key and value, in the order Git
/// reads them.
#[derive(Clone, Debug, Default)]
pub struct ConfigListCommand;

impl GitCommand for ConfigListCommand {
    type Output = Vec<(String, String)>;

    fn args(&self) -> Vec<String> {
        vec!["config".to_string(), "--list".to_string(), "-z".to_string()]
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<(String, String)>> {
        Ok(result
            .stdout_text()?
            .split('\0')
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once('\n') {
                Some((key, value)) => (key.to_owned(), value.to_owned()),
                // A key without `=` in the config file is a boolean `true`.
                None => (entry.to_owned(), "true".to_owned()),
            })
            .collect())
    }
}

/// `git config --local <key> <value>`, or `--add`.
#[derive(Clone, Debug)]
pub struct ConfigSetCommand {
    /// The key to set.
    pub key: String,

    /// The value.
    pub value: String,

    /// Add another value to a multi-valued key rather than replacing it.
    pub add: bool,
}

impl GitCommand for ConfigSetCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["config".to_string(), "--local".to_string()];
        if self.add {
            args.push("--add".to_string());
        }
        args.push(self.key.clone());
        args.push(self.value.clone());
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git config --local --unset-all <key>`. Unsetting a missing key succeeds.
#[derive(Clone, Debug)]
pub struct ConfigUnsetCommand {
    /// The key to remove.
    pub key: String,
}

impl GitCommand for ConfigUnsetCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        vec![
            "config".to_string(),
            "--local".to_string(),
            "--unset-all".to_string(),
            self.key.clone(),
        ]
    }

    fn treat_failure_as_error(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<()> {
        match result.exit_code.0 {
            // 5: the key was not set.
            0 | 5 => Ok(()),
            _ => Err(config_failed(self.args(), &result)),
        }
    }
}
