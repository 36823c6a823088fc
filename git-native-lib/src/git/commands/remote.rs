use std::time::Duration;

use super::GitCommand;
use crate::git::remote::{parse_ls_remote, parse_remote_list};
use crate::git::{GitRunResult, Remote, RemoteReference, Result};

/// `git remote add`.
#[derive(Clone, Debug)]
pub struct RemoteAddCommand {
    /// The name of the new remote.
    pub name: String,

    /// Its URL.
    pub url: String,

    /// Only track these branches. All branches if empty.
    pub branches: Vec<String>,
}

impl GitCommand for RemoteAddCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["remote".to_string(), "add".to_string()];
        for branch in &self.branches {
            args.push("-t".to_string());
            args.push(branch.clone());
        }
        args.push(self.name.clone());
        args.push(self.url.clone());
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git remote remove <name>`.
#[derive(Clone, Debug)]
pub struct RemoteDeleteCommand {
    /// The remote to remove.
    pub name: String,
}

impl GitCommand for RemoteDeleteCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        vec![
            "remote".to_string(),
            "remove".to_string(),
            self.name.clone(),
        ]
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git remote -v`.
#[derive(Clone, Debug, Default)]
pub struct RemoteListCommand {
    /// Only list the remote with this name.
    pub name: Option<String>,
}

impl GitCommand for RemoteListCommand {
    type Output = Vec<Remote>;

    fn args(&self) -> Vec<String> {
        vec!["remote".to_string(), "-v".to_string()]
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<Remote>> {
        let remotes = parse_remote_list(&result.stdout_text()?);
        Ok(match &self.name {
            Some(name) => remotes
                .into_iter()
                .filter(|remote| &remote.name == name)
                .collect(),
            None => remotes,
        })
    }
}

/// One change to an existing remote. Updating several aspects of a remote
/// takes one invocation per change.
#[derive(Clone, Debug)]
pub enum RemoteUpdateCommand {
    /// `git remote set-branches [--add] <name> <branch>...`.
    SetBranches {
        /// The remote to update.
        name: String,

        /// The branches to track.
        branches: Vec<String>,

        /// Add to the tracked branches rather than replacing them.
        add: bool,
    },

    /// `git remote set-url --add [--push] <name> <url>`.
    AddUrl {
        /// The remote to update.
        name: String,

        /// The URL to add.
        url: String,

        /// Add a push URL rather than a fetch URL.
        push: bool,
    },

    /// `git remote set-url --delete [--push] <name> <url>`.
    DeleteUrl {
        /// The remote to update.
        name: String,

        /// A regular expression matching the URLs to remove.
        url: String,

        /// Remove push URLs rather than fetch URLs.
        push: bool,
    },
}

impl GitCommand for RemoteUpdateCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["remote".to_string()];
        match self {
            RemoteUpdateCommand::SetBranches {
                name,
                branches,
                add,
            } => {
                args.push("set-branches".to_string());
                if *add {
                    args.push("--add".to_string());
                }
                args.push(name.clone());
                args.extend(branches.iter().cloned());
            }
            RemoteUpdateCommand::AddUrl { name, url, push } => {
                args.push("set-url".to_string());
                args.push("--add".to_string());
                if *push {
                    args.push("--push".to_string());
                }
                args.push(name.clone());
                args.push(url.clone());
            }
            RemoteUpdateCommand::DeleteUrl { name, url, push } => {
                args.push("set-url".to_string());
                args.push("--delete".to_string());
                if *push {
                    args.push("--push".to_string());
                }
                args.push(name.clone());
                args.push(url.clone());
            }
        }
        args
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git ls-remote <url>`: the references a remote repository advertises.
#[derive(Clone, Debug)]
pub struct LsRemoteCommand {
    /// The remote repository URL.
    pub url: String,

    /// Only list branches.
    pub heads_only: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

impl GitCommand for LsRemoteCommand {
    type Output = Vec<RemoteReference>;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["ls-remote".to_string()];
        if self.heads_only {
            args.push("--heads".to_string());
        }
        args.push(self.url.clone());
        args
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `ls-remote` may run outside of any repository.
    fn records_credentials_provider(&self) -> bool {
        false
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<RemoteReference>> {
        Ok(parse_ls_remote(&result.stdout_text()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_add_args() {
        let command = RemoteAddCommand {
            name: "upstream".to_string(),
            url: "https://example.com/repo.git".to_string(),
            branches: vec!["master".to_string(), "release".to_string()],
        };
        assert_eq!(
            command.args(),
            vec![
                "remote",
                "add",
                "-t",
                "master",
                "-t",
                "release",
                "upstream",
                "https://example.com/repo.git"
            ]
        );
    }

    #[test]
    fn test_remote_update_args() {
        let command = RemoteUpdateCommand::AddUrl {
            name: "origin".to_string(),
            url: "https://mirror.example.com/repo.git".to_string(),
            push: true,
        };
        assert_eq!(
            command.args(),
            vec![
                "remote",
                "set-url",
                "--add",
                "--push",
                "origin",
                "https://mirror.example.com/repo.git"
            ]
        );
    }
}
