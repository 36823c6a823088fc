use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

use tracing::{instrument, warn};

use crate::core::config::CREDENTIALS_PROVIDER_KEY;
use crate::core::context::RequestContext;
use crate::core::output::LineConsumerFactory;
use crate::git::commands::GitCommand;
use crate::git::{
    Config, CredentialsLoader, GitRunInfo, GitRunOpts, Result, SshScriptProvider,
};

/// Runs [`GitCommand`]s in one repository.
///
/// Holds no per-command state: the same `NativeGit` may run any number of
/// commands, from any number of threads.
#[derive(Clone, Debug)]
pub struct NativeGit {
    git_run_info: GitRunInfo,
    credentials_loader: Arc<CredentialsLoader>,
    ssh_script_provider: Arc<SshScriptProvider>,
    line_consumer_factory: Arc<dyn LineConsumerFactory>,
}

impl NativeGit {
    /// Construct an executor running Git as described by `git_run_info`.
    pub fn new(
        git_run_info: GitRunInfo,
        credentials_loader: Arc<CredentialsLoader>,
        ssh_script_provider: Arc<SshScriptProvider>,
        line_consumer_factory: Arc<dyn LineConsumerFactory>,
    ) -> Self {
        Self {
            git_run_info,
            credentials_loader,
            ssh_script_provider,
            line_consumer_factory,
        }
    }

    /// The directory commands are run in.
    pub fn repository_path(&self) -> &Path {
        self.git_run_info.working_directory()
    }

    /// How Git is invoked.
    pub fn git_run_info(&self) -> &GitRunInfo {
        &self.git_run_info
    }

    /// The loader consulted for remote credentials.
    pub fn credentials_loader(&self) -> &CredentialsLoader {
        &self.credentials_loader
    }

    /// Read and write the repository's configuration.
    pub fn config(&self) -> Config<'_> {
        Config::new(self)
    }

    fn run_opts<C: GitCommand>(
        &self,
        command: &C,
        auth_env: Vec<(OsString, OsString)>,
    ) -> GitRunOpts {
        let mut env = command.env();
        env.extend(auth_env);
        GitRunOpts {
            treat_git_failure_as_error: command.treat_failure_as_error(),
            env,
            timeout: command.timeout(),
            line_consumer: if command.streams_output() {
                Some(self.line_consumer_factory.new_line_consumer())
            } else {
                None
            },
        }
    }

    /// Run a command which does not talk to a remote.
    #[instrument]
    pub fn execute<C: GitCommand>(&self, command: &C) -> Result<C::Output> {
        let args = command.args();
        let result = self
            .git_run_info
            .run(&args, self.run_opts(command, Vec::new()))?;
        command.parse(result)
    }

    /// Run a command which talks to the remote at `remote_uri`.
    ///
    /// Credentials for `remote_uri` are looked up and handed to Git through
    /// the scripts from the [`SshScriptProvider`]. If the command succeeds
    /// with a credential, the id of the provider which supplied it is
    /// recorded under `codenvy.credentialsProvider`.
    #[instrument]
    pub fn execute_remote<C: GitCommand>(
        &self,
        command: &C,
        remote_uri: &str,
        ctx: &RequestContext,
    ) -> Result<C::Output> {
        let credential = self
            .credentials_loader
            .get_user_credential(remote_uri, ctx)?;
        let auth_env = self
            .ssh_script_provider
            .provide(remote_uri, credential.as_ref(), ctx)?;

        let args = command.args();
        let result = self
            .git_run_info
            .run(&args, self.run_opts(command, auth_env.env.clone()))?;
        drop(auth_env);
        let output = command.parse(result)?;

        if let Some(credential) = credential {
            if command.records_credentials_provider() {
                if let Err(err) = self
                    .config()
                    .set(CREDENTIALS_PROVIDER_KEY, &credential.provider_id)
                {
                    warn!(
                        ?err,
                        provider_id = ?credential.provider_id,
                        "Could not record credentials provider"
                    );
                }
            }
        }
        Ok(output)
    }
}
