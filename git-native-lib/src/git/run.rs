use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::core::config::env_vars::get_production_path_to_git;
use crate::core::output::LineConsumer;
use crate::git::{Error, Result};
use crate::util::ExitCode;

/// How often a child process with a timeout is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for the output readers of a timed-out process to see
/// end-of-file before abandoning them.
const READER_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Path to the `git` executable on disk to be executed.
#[derive(Clone)]
pub struct GitRunInfo {
    /// The path to the Git executable on disk.
    pub path_to_git: PathBuf,

    /// The working directory that the Git executable should be run in.
    pub working_directory: PathBuf,

    /// The environment variables that should be passed to the Git process.
    /// The process environment is cleared before these are applied.
    pub env: HashMap<OsString, OsString>,
}

impl std::fmt::Debug for GitRunInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<GitRunInfo path_to_git={:?} working_directory={:?} env=not shown>",
            self.path_to_git, self.working_directory
        )
    }
}

/// Options for invoking Git.
pub struct GitRunOpts {
    /// If set, a non-zero exit code will be treated as an error.
    pub treat_git_failure_as_error: bool,

    /// Environment variables to set for this invocation only, on top of
    /// [`GitRunInfo::env`].
    pub env: Vec<(OsString, OsString)>,

    /// Kill the process and fail if it runs for longer than this.
    pub timeout: Option<Duration>,

    /// Receives stdout and stderr lines while the process runs.
    pub line_consumer: Option<Arc<dyn LineConsumer>>,
}

impl Default for GitRunOpts {
    fn default() -> Self {
        Self {
            treat_git_failure_as_error: true,
            env: Vec::new(),
            timeout: None,
            line_consumer: None,
        }
    }
}

impl std::fmt::Debug for GitRunOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<GitRunOpts treat_git_failure_as_error={:?} timeout={:?} env=not shown>",
            self.treat_git_failure_as_error, self.timeout
        )
    }
}

/// The result of invoking Git.
#[must_use]
pub struct GitRunResult {
    /// The exit code of the process.
    pub exit_code: ExitCode,

    /// The stdout contents written by the invocation.
    pub stdout: Vec<u8>,

    /// The stderr contents written by the invocation.
    pub stderr: Vec<u8>,
}

impl std::fmt::Debug for GitRunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<GitRunResult exit_code={:?} stdout={:?} stderr={:?}>",
            self.exit_code,
            String::from_utf8_lossy(&self.stdout),
            String::from_utf8_lossy(&self.stderr),
        )
    }
}

impl GitRunResult {
    /// Decode stdout as UTF-8.
    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).map_err(|_| Error::DecodeUtf8 { item: "stdout" })
    }

    /// The text describing why the invocation failed: stderr, or stdout if
    /// Git wrote nothing to stderr (as `git commit` does when there is
    /// nothing to commit).
    pub fn failure_message(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_owned();
        }
        let stdout = String::from_utf8_lossy(&self.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_owned();
        }
        format!("git exited with code {}", self.exit_code)
    }
}

impl GitRunInfo {
    /// Run Git from `working_directory` with the environment of the current
    /// process.
    pub fn from_env(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            path_to_git: get_production_path_to_git(),
            working_directory: working_directory.into(),
            env: std::env::vars_os().collect(),
        }
    }

    /// A copy of this `GitRunInfo` which runs Git in another directory.
    pub fn with_working_directory(&self, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            ..self.clone()
        }
    }

    /// The directory Git is run in.
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    fn spawn_reader_thread<InputStream: Read + Send + 'static>(
        stream: Option<InputStream>,
        line_consumer: Option<Arc<dyn LineConsumer>>,
    ) -> JoinHandle<io::Result<Vec<u8>>> {
        thread::spawn(move || {
            let stream = match stream {
                Some(stream) => stream,
                None => return Ok(Vec::new()),
            };
            let mut reader = BufReader::new(stream);
            let mut contents = Vec::new();
            let mut line = Vec::new();
            loop {
                line.clear();
                if reader.read_until(b'\n', &mut line)? == 0 {
                    break;
                }
                if let Some(line_consumer) = &line_consumer {
                    let text = String::from_utf8_lossy(&line);
                    if let Err(err) = line_consumer.write_line(text.trim_end_matches(['\n', '\r']))
                    {
                        warn!(?err, "Could not forward Git output line");
                    }
                }
                contents.extend_from_slice(&line);
            }
            Ok(contents)
        })
    }

    fn join_reader_thread(handle: JoinHandle<io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
        let contents = handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "Git output reader panicked"))??;
        Ok(contents)
    }

    /// Wait for the reader threads of a killed process. A helper that left
    /// the process group may still hold the pipes open, in which case the
    /// threads are detached after [`READER_GRACE_PERIOD`].
    fn join_reader_threads_after_kill(handles: [JoinHandle<io::Result<Vec<u8>>>; 2]) {
        let deadline = Instant::now() + READER_GRACE_PERIOD;
        while handles.iter().any(|handle| !handle.is_finished()) {
            let now = Instant::now();
            if now >= deadline {
                warn!("Git output is still open after killing it; not waiting for it");
                return;
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
        for handle in handles {
            if let Err(err) = Self::join_reader_thread(handle) {
                debug!(?err, "Reading output of killed Git process failed");
            }
        }
    }

    /// Kill `child` along with everything it spawned (such as
    /// `git-remote-https` or `ssh`), then reap it.
    #[cfg(unix)]
    fn kill_process_group(child: &mut Child) -> io::Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        let pgid = i32::try_from(child.id())
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "Git process id out of range"))?;
        match killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
            Ok(()) | Err(Errno::ESRCH) => {}
            Err(err) => return Err(err.into()),
        }
        child.wait()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn kill_process_group(child: &mut Child) -> io::Result<()> {
        child.kill()?;
        child.wait()?;
        Ok(())
    }

    fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }

    fn run_inner(&self, args: &[&str], opts: GitRunOpts) -> Result<GitRunResult> {
        let GitRunInfo {
            path_to_git,
            working_directory,
            env,
        } = self;
        let GitRunOpts {
            treat_git_failure_as_error,
            env: extra_env,
            timeout,
            line_consumer,
        } = opts;

        debug!(?args, ?working_directory, "Running git");
        let mut command = Command::new(path_to_git);
        command.current_dir(working_directory);
        command.args(args);
        command.env_clear();
        command.envs(env.iter());
        command.envs(extra_env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())));
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        // A timed-out process is killed along with its group, so it gets a
        // group of its own.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            if timeout.is_some() {
                command.process_group(0);
            }
        }

        let mut child = command.spawn().map_err(Error::SpawnGit)?;

        let stdout = child.stdout.take();
        let stdout_thread = Self::spawn_reader_thread(stdout, line_consumer.clone());
        let stderr = child.stderr.take();
        let stderr_thread = Self::spawn_reader_thread(stderr, line_consumer);

        let exit_status = match timeout {
            None => child.wait()?,
            Some(timeout) => match Self::wait_with_timeout(&mut child, timeout)? {
                Some(exit_status) => exit_status,
                None => {
                    warn!(?args, ?timeout, "Git timed out; killing it");
                    Self::kill_process_group(&mut child)?;
                    Self::join_reader_threads_after_kill([stdout_thread, stderr_thread]);
                    return Err(Error::Timeout {
                        args: args.iter().join(" "),
                        timeout,
                    });
                }
            },
        };
        let stdout = Self::join_reader_thread(stdout_thread)?;
        let stderr = Self::join_reader_thread(stderr_thread)?;

        let exit_code = ExitCode::try_from(exit_status).unwrap_or(ExitCode(1));
        debug!(?args, %exit_code, "Git finished");
        let result = GitRunResult {
            exit_code,
            stdout,
            stderr,
        };
        if treat_git_failure_as_error && !exit_code.is_success() {
            return Err(Error::GitFailed {
                args: args.iter().map(|arg| arg.to_string()).collect(),
                exit_code,
                message: result.failure_message(),
            });
        }
        Ok(result)
    }

    /// Run Git in a subprocess and capture its output.
    ///
    /// `args` contains the list of arguments to pass to Git, not including
    /// the Git executable itself. stdin is closed, so Git can never block on
    /// an interactive prompt.
    #[instrument]
    pub fn run<S: AsRef<str> + std::fmt::Debug>(
        &self,
        args: &[S],
        opts: GitRunOpts,
    ) -> Result<GitRunResult> {
        self.run_inner(
            args.iter().map(AsRef::as_ref).collect_vec().as_slice(),
            opts,
        )
    }
}
