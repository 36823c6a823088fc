//! Tools for driving the native `git` executable.

mod classify;
pub mod commands;
mod config;
mod connection;
mod credentials;
mod error;
mod factory;
mod native;
mod reference;
mod remote;
mod revision;
mod run;
mod ssh;
mod status;
mod user;

pub use classify::{
    classify_remote_failure, AuthFailureClassifier, FailureKind, RegexAuthFailureClassifier,
};
pub use config::Config;
pub use connection::{
    CloneRequest, CommitRequest, FetchRequest, NativeGitConnection, PullRequest, PushRequest,
    RemoteUpdateRequest, TagCreateRequest,
};
pub use credentials::{
    BasicCredentialsProvider, CredentialsLoader, CredentialsProvider, UserCredential,
    BASIC_PROVIDER_ID,
};
pub use error::{Error, Result};
pub use factory::NativeGitConnectionFactory;
pub use native::NativeGit;
pub use reference::{parse_show_ref, Branch, BranchListMode, CategorizedReferenceName, ReferenceName};
pub use remote::{Remote, RemoteReference};
pub use revision::Revision;
pub use run::{GitRunInfo, GitRunOpts, GitRunResult};
pub use ssh::{is_ssh_url, RemoteAuthEnv, SshKeyProvider, SshScriptProvider};
pub use status::Status;
pub use user::{
    GitUser, InMemoryPreferenceStore, LocalUserResolver, PreferenceStore, UserResolver,
    ANONYMOUS_EMAIL, ANONYMOUS_NAME,
};
