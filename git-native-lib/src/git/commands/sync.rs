use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use super::{identity_env, GitCommand};
use crate::git::{GitRunResult, GitUser, Result};

fn command_output(result: &GitRunResult) -> String {
    let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&result.stderr));
    output
}

/// `git clone`.
#[derive(Clone, Debug)]
pub struct CloneCommand {
    /// The repository to clone.
    pub url: String,

    /// Where to clone to, relative to the working directory.
    pub directory: PathBuf,

    /// Name the remote this instead of `origin`.
    pub remote_name: Option<String>,

    /// Check out this branch instead of the remote's `HEAD`.
    pub branch: Option<String>,

    /// Initialize submodules.
    pub recursive: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

impl CloneCommand {
    /// Clone `url` into the working directory.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            directory: PathBuf::from("."),
            remote_name: None,
            branch: None,
            recursive: false,
            timeout: None,
        }
    }
}

impl GitCommand for CloneCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        let mut args = vec!["clone".to_string(), "--progress".to_string()];
        if let Some(remote_name) = &self.remote_name {
            args.push(format!("--origin={remote_name}"));
        }
        if let Some(branch) = &self.branch {
            args.push(format!("--branch={branch}"));
        }
        if self.recursive {
            args.push("--recurse-submodules".to_string());
        }
        args.push("--".to_string());
        args.push(self.url.clone());
        args.push(self.directory.to_string_lossy().into_owned());
        args
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn streams_output(&self) -> bool {
        true
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// The output of a fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    /// Everything Git printed.
    pub command_output: String,
}

/// `git fetch`.
#[derive(Clone, Debug)]
pub struct FetchCommand {
    /// The remote name or URL to fetch from.
    pub remote: String,

    /// What to fetch. The remote's configured refspecs if empty.
    pub refspecs: Vec<String>,

    /// Remove remote-tracking references which no longer exist on the remote.
    pub prune: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

impl GitCommand for FetchCommand {
    type Output = FetchResponse;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["fetch".to_string(), "--progress".to_string()];
        if self.prune {
            args.push("--prune".to_string());
        }
        args.push(self.remote.clone());
        args.extend(self.refspecs.iter().cloned());
        args
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn streams_output(&self) -> bool {
        true
    }

    fn parse(&self, result: GitRunResult) -> Result<FetchResponse> {
        Ok(FetchResponse {
            command_output: command_output(&result),
        })
    }
}

/// The output of a pull.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullResponse {
    /// Everything Git printed.
    pub command_output: String,
}

/// `git pull`.
#[derive(Clone, Debug)]
pub struct PullCommand {
    /// The remote name or URL to pull from.
    pub remote: String,

    /// What to pull. The current branch's upstream if not given.
    pub refspec: Option<String>,

    /// Rebase instead of merging.
    pub rebase: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,

    /// Create any merge commit as this user.
    pub committer: Option<GitUser>,
}

impl GitCommand for PullCommand {
    type Output = PullResponse;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["pull".to_string(), "--no-edit".to_string()];
        args.push(if self.rebase { "--rebase" } else { "--no-rebase" }.to_string());
        args.push(self.remote.clone());
        args.extend(self.refspec.iter().cloned());
        args
    }

    fn env(&self) -> Vec<(OsString, OsString)> {
        identity_env(self.committer.as_ref(), self.committer.as_ref())
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn streams_output(&self) -> bool {
        true
    }

    fn parse(&self, result: GitRunResult) -> Result<PullResponse> {
        Ok(PullResponse {
            command_output: command_output(&result),
        })
    }
}

/// How a single reference was updated by a push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushUpdate {
    /// The status flag: ` ` fast-forward, `+` forced, `-` deleted, `*` new,
    /// `!` rejected, `=` up to date.
    pub flag: char,

    /// The local reference, empty for a deletion.
    pub from: String,

    /// The remote reference.
    pub to: String,

    /// A human-readable summary, like `[new branch]`.
    pub summary: String,
}

/// The output of a push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushResponse {
    /// Everything Git printed.
    pub command_output: String,

    /// The references which were pushed.
    pub updates: Vec<PushUpdate>,
}

/// `git push`.
#[derive(Clone, Debug)]
pub struct PushCommand {
    /// The remote name or URL to push to.
    pub remote: String,

    /// What to push. The configured default if empty.
    pub refspecs: Vec<String>,

    /// Allow non-fast-forward updates.
    pub force: bool,

    /// Make the pushed branches track their remote counterparts.
    pub set_upstream: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

impl GitCommand for PushCommand {
    type Output = PushResponse;

    fn args(&self) -> Vec<String> {
        let mut args = vec![
            "push".to_string(),
            "--porcelain".to_string(),
            "--progress".to_string(),
        ];
        if self.force {
            args.push("--force".to_string());
        }
        if self.set_upstream {
            args.push("--set-upstream".to_string());
        }
        args.push(self.remote.clone());
        args.extend(self.refspecs.iter().cloned());
        args
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn streams_output(&self) -> bool {
        true
    }

    fn parse(&self, result: GitRunResult) -> Result<PushResponse> {
        Ok(PushResponse {
            updates: parse_push_porcelain(&String::from_utf8_lossy(&result.stdout)),
            command_output: command_output(&result),
        })
    }
}

/// Parse the reference lines of `git push --porcelain`:
/// `<flag>\t<from>:<to>\t<summary>`.
pub(crate) fn parse_push_porcelain(output: &str) -> Vec<PushUpdate> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, '\t');
            let flag = fields.next()?;
            let refspec = fields.next()?;
            let summary = fields.next().unwrap_or_default();
            let mut flag_chars = flag.chars();
            let flag = match (flag_chars.next(), flag_chars.next()) {
                (Some(flag), None) => flag,
                _ => return None,
            };
            let (from, to) = refspec.split_once(':')?;
            Some(PushUpdate {
                flag,
                from: from.to_owned(),
                to: to.to_owned(),
                summary: summary.to_owned(),
            })
        })
        .collect()
}
