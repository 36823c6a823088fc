//! The command-line options for `git-native`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Run Git operations through the native connection layer.
#[derive(Debug, Parser)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Opts {
    /// Change to the given directory before executing the rest of the
    /// program. (The option is called `-C` for symmetry with Git.)
    #[clap(value_parser, short = 'C', global = true)]
    pub working_directory: Option<PathBuf>,

    /// The subcommand to run.
    #[clap(subcommand)]
    pub command: Command,
}

/// `git-native` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the working tree status.
    Status,

    /// Show the commit history of `HEAD`.
    Log {
        /// Only show this many commits.
        #[clap(value_parser, short = 'n', long = "max-count")]
        max_count: Option<usize>,
    },

    /// List branches.
    Branch {
        /// List remote-tracking branches instead of local ones.
        #[clap(action, short = 'r', long = "remote", conflicts_with = "all")]
        remote: bool,

        /// List both local and remote-tracking branches.
        #[clap(action, short = 'a', long = "all")]
        all: bool,
    },

    /// List the configured remotes.
    Remote,

    /// Download objects and references from a remote.
    Fetch {
        /// The remote to fetch from. Defaults to `origin`.
        #[clap(value_parser)]
        remote: Option<String>,

        /// Remove remote-tracking references which no longer exist on the
        /// remote.
        #[clap(action, short = 'p', long = "prune")]
        prune: bool,
    },

    /// Fetch from a remote and integrate the changes into the current
    /// branch.
    Pull {
        /// The remote to pull from. Defaults to `origin`.
        #[clap(value_parser)]
        remote: Option<String>,

        /// Rebase the current branch instead of merging.
        #[clap(action, long = "rebase")]
        rebase: bool,
    },

    /// Update remote references.
    Push {
        /// The remote to push to. Defaults to `origin`.
        #[clap(value_parser)]
        remote: Option<String>,

        /// The references to push, like `HEAD:refs/heads/feature`.
        #[clap(value_parser)]
        refspecs: Vec<String>,

        /// Overwrite remote references even if the update is not a
        /// fast-forward.
        #[clap(action, short = 'f', long = "force")]
        force: bool,

        /// Set the pushed branch as the upstream of the local one.
        #[clap(action, short = 'u', long = "set-upstream")]
        set_upstream: bool,
    },

    /// Record changes to the repository as the local committer.
    Commit {
        /// The commit message.
        #[clap(value_parser, short = 'm', long = "message")]
        message: String,

        /// Stage all modified and deleted files first.
        #[clap(action, short = 'a', long = "all")]
        all: bool,
    },

    /// Clone a repository into a new directory.
    Clone {
        /// The repository to clone.
        #[clap(value_parser)]
        url: String,

        /// Where to clone it. Defaults to the last component of the URL.
        #[clap(value_parser)]
        directory: Option<PathBuf>,
    },

    /// Show who commits are attributed to.
    Committer,
}
