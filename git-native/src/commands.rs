//! Implementations of the `git-native` subcommands.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use lib::core::config::env_vars::{
    GIT_NATIVE_COMMITTER_EMAIL, GIT_NATIVE_COMMITTER_NAME, GIT_NATIVE_PASSWORD,
    GIT_NATIVE_USERNAME,
};
use lib::core::config::{COMMITTER_EMAIL_PREFERENCE, COMMITTER_NAME_PREFERENCE};
use lib::core::context::RequestContext;
use lib::core::output::StderrLineConsumerFactory;
use lib::git::commands::LogCommand;
use lib::git::{
    BasicCredentialsProvider, BranchListMode, CloneRequest, CommitRequest, CredentialsLoader,
    Error, FetchRequest, GitRunInfo, InMemoryPreferenceStore, LocalUserResolver,
    NativeGitConnection, NativeGitConnectionFactory, PullRequest, PushRequest, SshScriptProvider,
};
use lib::util::{ExitCode, EyreExitOr};
use tracing::{debug, instrument};

use crate::opts::Command;

/// The user id the command-line front end acts as. Its committer
/// preferences come from the environment.
pub const LOCAL_USER_ID: &str = "local";

/// Exit code for a remote operation rejected for lack of valid credentials.
pub const UNAUTHORIZED_EXIT_CODE: isize = 2;

/// Build the request context for this process: the local user, plus a basic
/// credential if one was supplied through the environment.
pub fn make_request_context() -> RequestContext {
    let ctx = RequestContext::anonymous().with_user_id(LOCAL_USER_ID);
    match std::env::var(GIT_NATIVE_USERNAME) {
        Ok(username) if !username.is_empty() => {
            let password = std::env::var(GIT_NATIVE_PASSWORD).unwrap_or_default();
            ctx.with_basic_credential(username, password)
        }
        Ok(_) | Err(_) => ctx,
    }
}

fn make_connection_factory(git_run_info: GitRunInfo) -> NativeGitConnectionFactory {
    let preference_store = InMemoryPreferenceStore::new();
    for (var, key) in [
        (GIT_NATIVE_COMMITTER_NAME, COMMITTER_NAME_PREFERENCE),
        (GIT_NATIVE_COMMITTER_EMAIL, COMMITTER_EMAIL_PREFERENCE),
    ] {
        if let Ok(value) = std::env::var(var) {
            preference_store.set(LOCAL_USER_ID, key, &value);
        }
    }
    let mount_root = git_run_info.working_directory().to_owned();
    NativeGitConnectionFactory::new(
        mount_root,
        git_run_info,
        Arc::new(CredentialsLoader::new(vec![Arc::new(BasicCredentialsProvider)])),
        Arc::new(SshScriptProvider::default()),
        Arc::new(LocalUserResolver::new(Arc::new(preference_store))),
    )
    .with_line_consumer_factory(Arc::new(StderrLineConsumerFactory::default()))
}

/// The directory `git clone <url>` would create: the last path component
/// of the URL, without a `.git` suffix.
pub fn default_clone_directory(url: &str) -> PathBuf {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/.git").unwrap_or(trimmed);
    let last = trimmed.rsplit(['/', ':', '\\']).next().unwrap_or(trimmed);
    let last = last.strip_suffix(".git").unwrap_or(last);
    if last.is_empty() {
        PathBuf::from("repository")
    } else {
        PathBuf::from(last)
    }
}

/// Report a connection error to the user and pick the exit code for it.
fn report_error(err: Error) -> EyreExitOr<()> {
    debug!(?err, "Operation failed");
    let exit_code = if err.is_unauthorized() {
        ExitCode(UNAUTHORIZED_EXIT_CODE)
    } else {
        ExitCode(1)
    };
    writeln!(std::io::stderr(), "error: {err}")?;
    Ok(Err(exit_code))
}

fn short_id(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

fn summary(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

fn run_command(
    connection: &NativeGitConnection,
    command: Command,
    out: &mut impl Write,
) -> lib::git::Result<std::io::Result<()>> {
    let result = match command {
        Command::Status => {
            let status = connection.status()?;
            write_status(out, &status)
        }

        Command::Log { max_count } => {
            let revisions = connection.log(&LogCommand {
                max_count,
                ..Default::default()
            })?;
            revisions.iter().try_for_each(|revision| {
                writeln!(
                    out,
                    "{} {} ({})",
                    short_id(&revision.id),
                    summary(&revision.message),
                    revision.author
                )
            })
        }

        Command::Branch { remote, all } => {
            let mode = match (remote, all) {
                (_, true) => BranchListMode::All,
                (true, false) => BranchListMode::Remote,
                (false, false) => BranchListMode::Local,
            };
            let branches = connection.branch_list(mode)?;
            branches.iter().try_for_each(|branch| {
                let marker = if branch.active { '*' } else { ' ' };
                writeln!(out, "{marker} {}", branch.display_name)
            })
        }

        Command::Remote => {
            let remotes = connection.remote_list(None)?;
            remotes.iter().try_for_each(|remote| {
                writeln!(out, "{}\t{}", remote.name, remote.url)?;
                match &remote.push_url {
                    Some(push_url) => writeln!(out, "{}\t{} (push)", remote.name, push_url),
                    None => Ok(()),
                }
            })
        }

        Command::Fetch { remote, prune } => {
            connection.fetch(&FetchRequest {
                remote,
                prune,
                ..Default::default()
            })?;
            Ok(())
        }

        Command::Pull { remote, rebase } => {
            connection.pull(&PullRequest {
                remote,
                rebase,
                ..Default::default()
            })?;
            Ok(())
        }

        Command::Push {
            remote,
            refspecs,
            force,
            set_upstream,
        } => {
            let response = connection.push(&PushRequest {
                remote,
                refspecs,
                force,
                set_upstream,
                ..Default::default()
            })?;
            response.updates.iter().try_for_each(|update| {
                writeln!(
                    out,
                    "{}\t{}:{}\t{}",
                    update.flag, update.from, update.to, update.summary
                )
            })
        }

        Command::Commit { message, all } => {
            let revision = connection.commit(&CommitRequest {
                message,
                all,
                ..Default::default()
            })?;
            if revision.fake {
                writeln!(out, "{}", revision.message)
            } else {
                writeln!(
                    out,
                    "[{} {}] {}",
                    revision.branch.as_deref().unwrap_or("detached HEAD"),
                    short_id(&revision.id),
                    summary(&revision.message)
                )
            }
        }

        Command::Clone { url, directory: _ } => {
            connection.clone_repo(&CloneRequest {
                url,
                ..Default::default()
            })?;
            writeln!(out, "Cloned into {:?}", connection.working_dir())
        }

        Command::Committer => {
            let committer = connection.get_local_committer()?;
            writeln!(out, "{committer}")
        }
    };
    Ok(result)
}

fn write_status(out: &mut impl Write, status: &lib::git::Status) -> std::io::Result<()> {
    match &status.branch_name {
        Some(branch_name) => writeln!(out, "On branch {branch_name}")?,
        None => writeln!(out, "HEAD detached")?,
    }
    if status.is_clean() {
        return writeln!(out, "nothing to commit, working tree clean");
    }
    let sections = [
        ("added", &status.added),
        ("changed", &status.changed),
        ("removed", &status.removed),
        ("missing", &status.missing),
        ("modified", &status.modified),
        ("untracked", &status.untracked),
        ("conflicting", &status.conflicting),
    ];
    for (label, paths) in sections {
        for path in paths {
            writeln!(out, "{label}: {path}")?;
        }
    }
    Ok(())
}

/// Run `command` against the repository in `git_run_info`'s working
/// directory.
#[instrument]
pub fn command_main(git_run_info: GitRunInfo, command: Command) -> EyreExitOr<()> {
    let ctx = make_request_context();
    let factory = make_connection_factory(git_run_info);
    let connection = match &command {
        Command::Clone { url, directory } => {
            let directory = directory
                .clone()
                .unwrap_or_else(|| default_clone_directory(url));
            factory.connect(&directory, &ctx)
        }
        _ => factory.connect(factory.mount_root(), &ctx),
    };
    dispatch(&connection, command)
}

fn dispatch(connection: &NativeGitConnection, command: Command) -> EyreExitOr<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run_command(connection, command, &mut out) {
        Ok(result) => {
            result?;
            Ok(Ok(()))
        }
        Err(err) => report_error(err),
    }
}
