use std::ffi::OsString;

use super::{identity_env, GitCommand};
use crate::git::{GitRunResult, GitUser, Result};

/// A tag, as listed by `git tag`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    /// The short name of the tag.
    pub name: String,
}

/// `git tag <name>`. Creates an annotated tag when a message is given.
#[derive(Clone, Debug, Default)]
pub struct TagCreateCommand {
    /// The name of the tag.
    pub name: String,

    /// The commit to tag. `HEAD` if not given.
    pub commit: Option<String>,

    /// The annotation message.
    pub message: Option<String>,

    /// Replace an existing tag with the same name.
    pub force: bool,

    /// Create the tag as this user.
    pub tagger: Option<GitUser>,
}

impl GitCommand for TagCreateCommand {
    type Output = Tag;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["tag".to_string()];
        if let Some(message) = &self.message {
            args.push("-a".to_string());
            args.push(format!("--message={message}"));
        }
        if self.force {
            args.push("--force".to_string());
        }
        args.push(self.name.clone());
        args.extend(self.commit.iter().cloned());
        args
    }

    fn env(&self) -> Vec<(OsString, OsString)> {
        identity_env(self.tagger.as_ref(), None)
    }

    fn parse(&self, _result: GitRunResult) -> Result<Tag> {
        Ok(Tag {
            name: self.name.clone(),
        })
    }
}

/// `git tag --delete <name>`.
#[derive(Clone, Debug)]
pub struct TagDeleteCommand {
    /// The tag to delete.
    pub name: String,
}

impl GitCommand for TagDeleteCommand {
    type Output = ();

    fn args(&self) -> Vec<String> {
        vec![
            "tag".to_string(),
            "--delete".to_string(),
            self.name.clone(),
        ]
    }

    fn parse(&self, _result: GitRunResult) -> Result<()> {
        Ok(())
    }
}

/// `git tag --list [<pattern>]`.
#[derive(Clone, Debug, Default)]
pub struct TagListCommand {
    /// A shell wildcard pattern the tag names must match.
    pub pattern: Option<String>,
}

impl GitCommand for TagListCommand {
    type Output = Vec<Tag>;

    fn args(&self) -> Vec<String> {
        let mut args = vec!["tag".to_string(), "--list".to_string()];
        args.extend(self.pattern.iter().cloned());
        args
    }

    fn parse(&self, result: GitRunResult) -> Result<Vec<Tag>> {
        Ok(result
            .stdout_text()?
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Tag {
                name: name.to_owned(),
            })
            .collect())
    }
}
