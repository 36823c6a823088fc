use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::instrument;

use crate::core::context::RequestContext;
use crate::core::output::{LineConsumerFactory, NullLineConsumerFactory};
use crate::git::{
    AuthFailureClassifier, CredentialsLoader, GitRunInfo, NativeGit, NativeGitConnection,
    RegexAuthFailureClassifier, SshScriptProvider, UserResolver,
};

/// Creates [`NativeGitConnection`]s for working directories under a common
/// mount root.
#[derive(Clone, Debug)]
pub struct NativeGitConnectionFactory {
    mount_root: PathBuf,
    git_run_info: GitRunInfo,
    credentials_loader: Arc<CredentialsLoader>,
    ssh_script_provider: Arc<SshScriptProvider>,
    user_resolver: Arc<dyn UserResolver>,
    classifier: Arc<dyn AuthFailureClassifier>,
    line_consumer_factory: Arc<dyn LineConsumerFactory>,
}

impl NativeGitConnectionFactory {
    /// Construct a factory. `git_run_info` supplies the Git executable and
    /// environment; its working directory is replaced for each connection.
    pub fn new(
        mount_root: impl Into<PathBuf>,
        git_run_info: GitRunInfo,
        credentials_loader: Arc<CredentialsLoader>,
        ssh_script_provider: Arc<SshScriptProvider>,
        user_resolver: Arc<dyn UserResolver>,
    ) -> Self {
        Self {
            mount_root: mount_root.into(),
            git_run_info,
            credentials_loader,
            ssh_script_provider,
            user_resolver,
            classifier: Arc::new(RegexAuthFailureClassifier),
            line_consumer_factory: Arc::new(NullLineConsumerFactory),
        }
    }

    /// Use `classifier` to recognize authentication failures.
    pub fn with_classifier(self, classifier: Arc<dyn AuthFailureClassifier>) -> Self {
        Self { classifier, ..self }
    }

    /// Send the progress output of long-running commands to consumers from
    /// `line_consumer_factory`.
    pub fn with_line_consumer_factory(
        self,
        line_consumer_factory: Arc<dyn LineConsumerFactory>,
    ) -> Self {
        Self {
            line_consumer_factory,
            ..self
        }
    }

    /// The directory relative working directories are resolved against.
    pub fn mount_root(&self) -> &Path {
        &self.mount_root
    }

    /// Connect to the working directory `path`, acting as the user resolved
    /// for `ctx`. A relative `path` is resolved against the mount root.
    #[instrument]
    pub fn connect(&self, path: &Path, ctx: &RequestContext) -> NativeGitConnection {
        let working_directory = if path.is_absolute() {
            path.to_owned()
        } else {
            self.mount_root.join(path)
        };
        let native_git = NativeGit::new(
            self.git_run_info.with_working_directory(working_directory),
            Arc::clone(&self.credentials_loader),
            Arc::clone(&self.ssh_script_provider),
            Arc::clone(&self.line_consumer_factory),
        );
        let user = self.user_resolver.resolve(ctx);
        NativeGitConnection::new(native_git, user, ctx.clone(), Arc::clone(&self.classifier))
    }
}
