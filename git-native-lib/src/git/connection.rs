use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::core::config::{CREDENTIALS_PROVIDER_KEY, DEFAULT_REMOTE_NAME};
use crate::core::context::RequestContext;
use crate::git::commands::{
    AddCommand, BranchCreateCommand, BranchDeleteCommand, BranchListCommand,
    BranchRenameCommand, CatFileTypeCommand, CheckoutCommand, CloneCommand, CommitCommand,
    CommittersCommand, CurrentBranchCommand, DiffCommand, FetchCommand, FetchResponse,
    GitCommand, InitCommand, IsInsideWorkTreeCommand, LogCommand, LsRemoteCommand, MergeCommand,
    MergeResult, MergeStatus, MvCommand, PullCommand, PullResponse, PushCommand, PushResponse,
    RemoteAddCommand, RemoteDeleteCommand, RemoteListCommand, RemoteUpdateCommand, ResetCommand,
    RevParseCommand, RmCommand, ShowFileContentCommand, ShowRefCommand, ShowToplevelCommand,
    StatusCommand, Tag, TagCreateCommand, TagDeleteCommand, TagListCommand,
};
use crate::git::{
    classify_remote_failure, AuthFailureClassifier, Branch, BranchListMode,
    CategorizedReferenceName, Config, Error, GitUser, NativeGit, ReferenceName, Remote,
    RemoteReference, Result, Revision, Status,
};

/// Messages with which `git commit` reports that there was nothing to
/// commit.
const NOTHING_TO_COMMIT_MESSAGES: &[&str] = &[
    "nothing to commit",
    "nothing added to commit",
    "no changes added to commit",
];

fn is_nothing_to_commit(err: &Error) -> bool {
    match err {
        Error::GitFailed { message, .. } => NOTHING_TO_COMMIT_MESSAGES
            .iter()
            .any(|pattern| message.contains(pattern)),
        _ => false,
    }
}

/// Options for [`NativeGitConnection::commit`].
#[derive(Clone, Debug, Default)]
pub struct CommitRequest {
    /// The commit message.
    pub message: String,

    /// Stage all modified and deleted tracked files first.
    pub all: bool,

    /// Replace the tip of the current branch.
    pub amend: bool,

    /// Commit only these files.
    pub files: Vec<String>,
}

/// Options for [`NativeGitConnection::clone_repo`].
#[derive(Clone, Debug, Default)]
pub struct CloneRequest {
    /// The repository to clone.
    pub url: String,

    /// Name the remote this instead of `origin`.
    pub remote_name: Option<String>,

    /// Check out this branch instead of the remote's `HEAD`.
    pub branch: Option<String>,

    /// Initialize submodules.
    pub recursive: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

/// Options for [`NativeGitConnection::fetch`].
#[derive(Clone, Debug, Default)]
pub struct FetchRequest {
    /// The remote to fetch from. `origin` if not given.
    pub remote: Option<String>,

    /// What to fetch. The remote's configured refspecs if empty.
    pub refspecs: Vec<String>,

    /// Remove remote-tracking references which no longer exist on the remote.
    pub prune: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

/// Options for [`NativeGitConnection::pull`].
#[derive(Clone, Debug, Default)]
pub struct PullRequest {
    /// The remote to pull from. `origin` if not given.
    pub remote: Option<String>,

    /// What to pull. The current branch's upstream if not given.
    pub refspec: Option<String>,

    /// Rebase instead of merging.
    pub rebase: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

/// Options for [`NativeGitConnection::push`].
#[derive(Clone, Debug, Default)]
pub struct PushRequest {
    /// The remote to push to. `origin` if not given.
    pub remote: Option<String>,

    /// What to push. The configured default if empty.
    pub refspecs: Vec<String>,

    /// Allow non-fast-forward updates.
    pub force: bool,

    /// Make the pushed branches track their remote counterparts.
    pub set_upstream: bool,

    /// Give up after this long.
    pub timeout: Option<Duration>,
}

/// Options for [`NativeGitConnection::remote_update`].
#[derive(Clone, Debug, Default)]
pub struct RemoteUpdateRequest {
    /// The remote to update.
    pub name: String,

    /// Branches to track.
    pub branches: Vec<String>,

    /// Add `branches` to the tracked branches rather than replacing them.
    pub add_branches: bool,

    /// Fetch URLs to add.
    pub add_urls: Vec<String>,

    /// Fetch URLs to remove.
    pub remove_urls: Vec<String>,

    /// Push URLs to add.
    pub add_push_urls: Vec<String>,

    /// Push URLs to remove.
    pub remove_push_urls: Vec<String>,
}

/// Options for [`NativeGitConnection::tag_create`].
#[derive(Clone, Debug, Default)]
pub struct TagCreateRequest {
    /// The name of the tag.
    pub name: String,

    /// The commit to tag. `HEAD` if not given.
    pub commit: Option<String>,

    /// Create an annotated tag with this message.
    pub message: Option<String>,

    /// Replace an existing tag with the same name.
    pub force: bool,
}

/// A connection to the repository in one working directory, acting on behalf
/// of one user.
///
/// Operations which modify the repository first check that the working
/// directory is the root of a repository, so that a subdirectory of some
/// unrelated enclosing repository is never modified by accident.
#[derive(Clone, Debug)]
pub struct NativeGitConnection {
    native_git: NativeGit,
    user: GitUser,
    ctx: RequestContext,
    classifier: Arc<dyn AuthFailureClassifier>,
}

impl NativeGitConnection {
    /// Construct a connection.
    pub fn new(
        native_git: NativeGit,
        user: GitUser,
        ctx: RequestContext,
        classifier: Arc<dyn AuthFailureClassifier>,
    ) -> Self {
        Self {
            native_git,
            user,
            ctx,
            classifier,
        }
    }

    /// The working directory this connection is bound to.
    pub fn working_dir(&self) -> &Path {
        self.native_git.repository_path()
    }

    /// The user this connection acts on behalf of.
    pub fn user(&self) -> &GitUser {
        &self.user
    }

    /// The executor this connection delegates to.
    pub fn native_git(&self) -> &NativeGit {
        &self.native_git
    }

    /// Fail with [`Error::NotAGitRepository`] unless the working directory is
    /// the root of a working tree.
    pub fn ensure_repo_root_in_working_directory(&self) -> Result<()> {
        let working_dir = self.working_dir();
        let not_a_repository = || Error::NotAGitRepository {
            path: working_dir.to_owned(),
        };
        let toplevel = match self.native_git.execute(&ShowToplevelCommand) {
            Ok(toplevel) => toplevel,
            Err(Error::GitFailed { .. }) => return Err(not_a_repository()),
            Err(err) => return Err(err),
        };
        let canonicalize = |path: &Path| -> PathBuf {
            path.canonicalize().unwrap_or_else(|_| path.to_owned())
        };
        if canonicalize(&toplevel) == canonicalize(working_dir) {
            Ok(())
        } else {
            debug!(?toplevel, ?working_dir, "Working directory is not a repository root");
            Err(not_a_repository())
        }
    }

    /// The URL of the remote named `remote`. If it can't be determined, the
    /// name itself is returned: it is only used to look up credentials and to
    /// describe failures, while Git still resolves the remote by name.
    fn resolve_remote_uri(&self, remote: &str) -> String {
        let remotes = self.native_git.execute(&RemoteListCommand {
            name: Some(remote.to_owned()),
        });
        match remotes.map(|remotes| remotes.into_iter().next()) {
            Ok(Some(Remote { url, .. })) => url,
            Ok(None) => {
                debug!(?remote, "No such remote; using its name as URI");
                remote.to_owned()
            }
            Err(err) => {
                debug!(?remote, ?err, "Could not resolve remote; using its name as URI");
                remote.to_owned()
            }
        }
    }

    fn execute_remote<C: GitCommand>(&self, command: &C, remote_uri: &str) -> Result<C::Output> {
        self.native_git
            .execute_remote(command, remote_uri, &self.ctx)
            .map_err(|err| classify_remote_failure(self.classifier.as_ref(), remote_uri, err))
    }

    /// Create a repository in the working directory.
    #[instrument]
    pub fn init(&self, bare: bool) -> Result<()> {
        std::fs::create_dir_all(self.working_dir())?;
        self.native_git.execute(&InitCommand { bare })
    }

    /// Clone a repository into the working directory, which must be empty or
    /// not exist yet.
    #[instrument]
    pub fn clone_repo(&self, request: &CloneRequest) -> Result<()> {
        let working_dir = self.working_dir();
        std::fs::create_dir_all(working_dir)?;
        if std::fs::read_dir(working_dir)?.next().is_some() {
            return Err(Error::DirectoryNotEmpty {
                path: working_dir.to_owned(),
            });
        }
        let CloneRequest {
            url,
            remote_name,
            branch,
            recursive,
            timeout,
        } = request;
        let command = CloneCommand {
            remote_name: remote_name.clone(),
            branch: branch.clone(),
            recursive: *recursive,
            timeout: *timeout,
            ..CloneCommand::new(url.clone())
        };
        self.execute_remote(&command, url)
    }

    /// Whether the working directory is inside a working tree.
    #[instrument]
    pub fn is_inside_work_tree(&self) -> Result<bool> {
        if !self.working_dir().is_dir() {
            return Ok(false);
        }
        self.native_git.execute(&IsInsideWorkTreeCommand)
    }

    /// Stage `paths`, or everything if empty.
    #[instrument]
    pub fn add(&self, paths: &[String], update: bool) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&AddCommand {
            paths: paths.to_vec(),
            update,
        })
    }

    /// Remove `paths` from the index, and from the working tree unless
    /// `cached` is set.
    #[instrument]
    pub fn rm(&self, paths: &[String], cached: bool, recursive: bool) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&RmCommand {
            paths: paths.to_vec(),
            cached,
            recursive,
        })
    }

    /// Move or rename a tracked file.
    #[instrument]
    pub fn mv(&self, source: &str, target: &str) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&MvCommand {
            source: source.to_owned(),
            target: target.to_owned(),
        })
    }

    /// `git reset`.
    #[instrument]
    pub fn reset(&self, command: &ResetCommand) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(command)
    }

    /// `git checkout`.
    #[instrument]
    pub fn checkout(&self, command: &CheckoutCommand) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(command)
    }

    /// Commit as the local committer, who is also recorded as the author.
    ///
    /// If there was nothing to commit, a fake [`Revision`] carrying Git's
    /// message is returned instead of an error. Any other failure is an
    /// error.
    #[instrument]
    pub fn commit(&self, request: &CommitRequest) -> Result<Revision> {
        self.ensure_repo_root_in_working_directory()?;
        let committer = self.get_local_committer()?;
        let CommitRequest {
            message,
            all,
            amend,
            files,
        } = request;
        let command = CommitCommand {
            message: message.clone(),
            all: *all,
            amend: *amend,
            files: files.clone(),
            author: Some(committer.clone()),
            committer: Some(committer),
        };
        match self.native_git.execute(&command) {
            Ok(()) => {}
            Err(err) if is_nothing_to_commit(&err) => {
                debug!(?err, "Nothing to commit");
                return Ok(Revision::fake(err.to_string()));
            }
            Err(err) => return Err(err),
        }

        let mut revision = self
            .native_git
            .execute(&LogCommand {
                max_count: Some(1),
                ..Default::default()
            })?
            .into_iter()
            .next()
            .ok_or_else(|| Error::ResolveRef {
                name: "HEAD".to_string(),
            })?;
        revision.branch = self.native_git.execute(&CurrentBranchCommand)?;
        Ok(revision)
    }

    /// `git log`.
    #[instrument]
    pub fn log(&self, command: &LogCommand) -> Result<Vec<Revision>> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(command)
    }

    /// The state of the index and working tree.
    #[instrument]
    pub fn status(&self) -> Result<Status> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&StatusCommand)
    }

    /// `git diff`.
    #[instrument]
    pub fn diff(&self, command: &DiffCommand) -> Result<String> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(command)
    }

    /// The contents of `path` at `revision`.
    #[instrument]
    pub fn show_file_content(&self, revision: &str, path: &str) -> Result<String> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&ShowFileContentCommand {
            revision: revision.to_owned(),
            path: path.to_owned(),
        })
    }

    /// Merge `commit`, which must name a commit or a tag, into the current
    /// branch.
    #[instrument]
    pub fn merge(&self, commit: &str) -> Result<MergeResult> {
        self.ensure_repo_root_in_working_directory()?;
        let kind = self.native_git.execute(&CatFileTypeCommand {
            object: commit.to_owned(),
        })?;
        if kind != "commit" && kind != "tag" {
            return Err(Error::InvalidMergeObject {
                object: commit.to_owned(),
                kind,
            });
        }

        let committer = self.get_local_committer()?;
        let mut merge_result = self.native_git.execute(&MergeCommand {
            commit: commit.to_owned(),
            committer: Some(committer),
        })?;
        if merge_result.status != MergeStatus::Failed {
            merge_result.new_head = Some(self.native_git.execute(&RevParseCommand {
                revision: "HEAD".to_string(),
            })?);
        }
        Ok(merge_result)
    }

    /// Create a branch at `start_point`, or at `HEAD`.
    #[instrument]
    pub fn branch_create(&self, name: &str, start_point: Option<&str>) -> Result<Branch> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&BranchCreateCommand {
            name: name.to_owned(),
            start_point: start_point.map(ToOwned::to_owned),
        })?;
        let reference = ReferenceName::from(format!("refs/heads/{name}"));
        let branch = self
            .native_git
            .execute(&BranchListCommand {
                mode: BranchListMode::Local,
            })?
            .into_iter()
            .find(|branch| branch.name == reference.as_str())
            .unwrap_or_else(|| Branch::from_reference(&reference, false));
        Ok(branch)
    }

    /// List branches.
    #[instrument]
    pub fn branch_list(&self, mode: BranchListMode) -> Result<Vec<Branch>> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&BranchListCommand { mode })
    }

    /// The fully-qualified name of the reference `name` resolves to, as
    /// reported by `git show-ref`.
    #[instrument]
    pub fn get_branch_ref(&self, name: &str) -> Result<ReferenceName> {
        self.native_git
            .execute(&ShowRefCommand {
                name: name.to_owned(),
            })?
            .ok_or_else(|| Error::ResolveRef {
                name: name.to_owned(),
            })
    }

    /// Delete a branch. A remote-tracking branch like `origin/topic` is
    /// deleted on its remote.
    #[instrument]
    pub fn branch_delete(&self, name: &str, force: bool) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        let reference = self.get_branch_ref(name)?;
        let categorized = CategorizedReferenceName::new(&reference);
        match categorized {
            CategorizedReferenceName::RemoteBranch { .. } => {
                let remote = categorized
                    .remote_name()
                    .ok_or_else(|| Error::ResolveRef {
                        name: name.to_owned(),
                    })?;
                let remote_uri = self.resolve_remote_uri(remote);
                let command = BranchDeleteCommand::Remote {
                    remote: remote.to_owned(),
                    name: categorized.branch_name().to_owned(),
                };
                self.execute_remote(&command, &remote_uri)
            }
            CategorizedReferenceName::LocalBranch { .. } => {
                self.native_git.execute(&BranchDeleteCommand::Local {
                    name: categorized.remove_prefix().to_owned(),
                    force,
                })
            }
            CategorizedReferenceName::OtherRef { .. } => {
                self.native_git.execute(&BranchDeleteCommand::Local {
                    name: name.to_owned(),
                    force,
                })
            }
        }
    }

    /// Rename a branch. A remote-tracking branch like `origin/topic` is
    /// renamed on its remote.
    #[instrument]
    pub fn branch_rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        let reference = self.get_branch_ref(old_name)?;
        let categorized = CategorizedReferenceName::new(&reference);
        match categorized {
            CategorizedReferenceName::RemoteBranch { .. } => {
                let remote = categorized
                    .remote_name()
                    .ok_or_else(|| Error::ResolveRef {
                        name: old_name.to_owned(),
                    })?;
                let remote_uri = self.resolve_remote_uri(remote);
                let new_name = new_name
                    .strip_prefix(remote)
                    .and_then(|suffix| suffix.strip_prefix('/'))
                    .unwrap_or(new_name);
                let command = BranchRenameCommand::Remote {
                    remote: remote.to_owned(),
                    old_name: categorized.branch_name().to_owned(),
                    new_name: new_name.to_owned(),
                };
                self.execute_remote(&command, &remote_uri)
            }
            CategorizedReferenceName::LocalBranch { .. } | CategorizedReferenceName::OtherRef { .. } => {
                self.native_git.execute(&BranchRenameCommand::Local {
                    old_name: categorized.remove_prefix().to_owned(),
                    new_name: new_name.to_owned(),
                })
            }
        }
    }

    /// Add a remote.
    #[instrument]
    pub fn remote_add(&self, command: &RemoteAddCommand) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(command)
    }

    /// Remove a remote and its remote-tracking branches.
    #[instrument]
    pub fn remote_delete(&self, name: &str) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&RemoteDeleteCommand {
            name: name.to_owned(),
        })
    }

    /// List remotes, or only the remote called `name`, which must exist.
    #[instrument]
    pub fn remote_list(&self, name: Option<&str>) -> Result<Vec<Remote>> {
        self.ensure_repo_root_in_working_directory()?;
        let remotes = self.native_git.execute(&RemoteListCommand {
            name: name.map(ToOwned::to_owned),
        })?;
        match name {
            Some(name) if remotes.is_empty() => Err(Error::NoSuchRemote {
                name: name.to_owned(),
            }),
            _ => Ok(remotes),
        }
    }

    /// Change the tracked branches and URLs of a remote.
    #[instrument]
    pub fn remote_update(&self, request: &RemoteUpdateRequest) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        let RemoteUpdateRequest {
            name,
            branches,
            add_branches,
            add_urls,
            remove_urls,
            add_push_urls,
            remove_push_urls,
        } = request;
        self.remote_list(Some(name))?;

        let mut commands = Vec::new();
        if !branches.is_empty() {
            commands.push(RemoteUpdateCommand::SetBranches {
                name: name.clone(),
                branches: branches.clone(),
                add: *add_branches,
            });
        }
        for (urls, push) in [(add_urls, false), (add_push_urls, true)] {
            commands.extend(urls.iter().map(|url| RemoteUpdateCommand::AddUrl {
                name: name.clone(),
                url: url.clone(),
                push,
            }));
        }
        for (urls, push) in [(remove_urls, false), (remove_push_urls, true)] {
            commands.extend(urls.iter().map(|url| RemoteUpdateCommand::DeleteUrl {
                name: name.clone(),
                url: regex::escape(url),
                push,
            }));
        }
        for command in &commands {
            self.native_git.execute(command)?;
        }
        Ok(())
    }

    /// Fetch from a remote, `origin` by default.
    #[instrument]
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.ensure_repo_root_in_working_directory()?;
        let FetchRequest {
            remote,
            refspecs,
            prune,
            timeout,
        } = request;
        let remote = remote.as_deref().unwrap_or(DEFAULT_REMOTE_NAME);
        let remote_uri = self.resolve_remote_uri(remote);
        let command = FetchCommand {
            remote: remote.to_owned(),
            refspecs: refspecs.clone(),
            prune: *prune,
            timeout: *timeout,
        };
        self.execute_remote(&command, &remote_uri)
    }

    /// Pull from a remote, `origin` by default, committing any merge as the
    /// local committer.
    #[instrument]
    pub fn pull(&self, request: &PullRequest) -> Result<PullResponse> {
        self.ensure_repo_root_in_working_directory()?;
        let PullRequest {
            remote,
            refspec,
            rebase,
            timeout,
        } = request;
        let remote = remote.as_deref().unwrap_or(DEFAULT_REMOTE_NAME);
        let remote_uri = self.resolve_remote_uri(remote);
        let command = PullCommand {
            remote: remote.to_owned(),
            refspec: refspec.clone(),
            rebase: *rebase,
            timeout: *timeout,
            committer: Some(self.get_local_committer()?),
        };
        self.execute_remote(&command, &remote_uri)
    }

    /// Push to a remote, `origin` by default.
    #[instrument]
    pub fn push(&self, request: &PushRequest) -> Result<PushResponse> {
        self.ensure_repo_root_in_working_directory()?;
        let PushRequest {
            remote,
            refspecs,
            force,
            set_upstream,
            timeout,
        } = request;
        let remote = remote.as_deref().unwrap_or(DEFAULT_REMOTE_NAME);
        let remote_uri = self.resolve_remote_uri(remote);
        let command = PushCommand {
            remote: remote.to_owned(),
            refspecs: refspecs.clone(),
            force: *force,
            set_upstream: *set_upstream,
            timeout: *timeout,
        };
        self.execute_remote(&command, &remote_uri)
    }

    /// The references advertised by the repository at `url`. Works outside
    /// of any repository.
    #[instrument]
    pub fn ls_remote(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<RemoteReference>> {
        let command = LsRemoteCommand {
            url: url.to_owned(),
            heads_only: false,
            timeout,
        };
        self.execute_remote(&command, url)
    }

    /// Create a tag as the local committer.
    #[instrument]
    pub fn tag_create(&self, request: &TagCreateRequest) -> Result<Tag> {
        self.ensure_repo_root_in_working_directory()?;
        let TagCreateRequest {
            name,
            commit,
            message,
            force,
        } = request;
        self.native_git.execute(&TagCreateCommand {
            name: name.clone(),
            commit: commit.clone(),
            message: message.clone(),
            force: *force,
            tagger: Some(self.get_local_committer()?),
        })
    }

    /// Delete a tag.
    #[instrument]
    pub fn tag_delete(&self, name: &str) -> Result<()> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&TagDeleteCommand {
            name: name.to_owned(),
        })
    }

    /// List tags, optionally only those matching a shell wildcard pattern.
    #[instrument]
    pub fn tag_list(&self, pattern: Option<&str>) -> Result<Vec<Tag>> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&TagListCommand {
            pattern: pattern.map(ToOwned::to_owned),
        })
    }

    /// The repository's configuration.
    pub fn get_config(&self) -> Config<'_> {
        self.native_git.config()
    }

    /// The identity to commit as.
    ///
    /// If a credentials provider was recorded under
    /// `codenvy.credentialsProvider` and it knows an identity for this
    /// request, that identity is used. Otherwise it is the user this
    /// connection was created for.
    #[instrument]
    pub fn get_local_committer(&self) -> Result<GitUser> {
        if let Some(provider_id) = self.get_config().get(CREDENTIALS_PROVIDER_KEY)? {
            if let Some(user) = self
                .native_git
                .credentials_loader()
                .get_user(&provider_id, &self.ctx)?
            {
                debug!(?provider_id, %user, "Using committer from credentials provider");
                return Ok(user);
            }
        }
        Ok(self.user.clone())
    }

    /// Everyone who committed to the history of `HEAD`, each once.
    #[instrument]
    pub fn get_committers(&self) -> Result<Vec<GitUser>> {
        self.ensure_repo_root_in_working_directory()?;
        self.native_git.execute(&CommittersCommand)
    }
}
