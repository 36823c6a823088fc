//! Streaming of raw process output to an external sink.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A sink receiving the raw output of a Git invocation, one line at a time,
/// while the process is still running. Used for live progress reporting.
pub trait LineConsumer: Debug + Send + Sync {
    /// Receive one line of output, without its trailing newline.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Creates a [`LineConsumer`] for each Git invocation that streams output.
pub trait LineConsumerFactory: Debug + Send + Sync {
    /// Create a consumer for a new invocation.
    fn new_line_consumer(&self) -> Arc<dyn LineConsumer>;
}

/// Discards all lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLineConsumer;

impl LineConsumer for NullLineConsumer {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Creates [`NullLineConsumer`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullLineConsumerFactory;

impl LineConsumerFactory for NullLineConsumerFactory {
    fn new_line_consumer(&self) -> Arc<dyn LineConsumer> {
        Arc::new(NullLineConsumer)
    }
}

/// Writes each line to the wrapped writer, optionally prefixed.
pub struct WriterLineConsumer<W> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W> Debug for WriterLineConsumer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<WriterLineConsumer prefix={:?}>", self.prefix)
    }
}

impl<W: Write + Send> WriterLineConsumer<W> {
    /// Constructor.
    pub fn new(writer: W, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> LineConsumer for WriterLineConsumer<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}{}", self.prefix, line)?;
        writer.flush()
    }
}

/// Creates consumers which write to the process's stderr.
#[derive(Clone, Debug, Default)]
pub struct StderrLineConsumerFactory {
    /// Prepended to every line.
    pub prefix: String,
}

impl LineConsumerFactory for StderrLineConsumerFactory {
    fn new_line_consumer(&self) -> Arc<dyn LineConsumer> {
        Arc::new(WriterLineConsumer::new(io::stderr(), self.prefix.clone()))
    }
}

/// Keeps every line in memory. All consumers created by the same factory
/// share one buffer.
#[derive(Clone, Debug, Default)]
pub struct CollectingLineConsumer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CollectingLineConsumer {
    /// The lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LineConsumer for CollectingLineConsumer {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
        Ok(())
    }
}

impl LineConsumerFactory for CollectingLineConsumer {
    fn new_line_consumer(&self) -> Arc<dyn LineConsumer> {
        Arc::new(self.clone())
    }
}
