use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, Once};

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt, TestWriter};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

use crate::LoggingConfig;

static TRACING_INIT: Once = Once::new();

/// Install the global `tracing` subscriber described by `config`.
///
/// Safe to call more than once: only the first call installs a subscriber.
/// Returns whether this call performed the installation.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed = false;
    TRACING_INIT.call_once(|| {
        let subscriber = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(fmt_layer(config, make_writer(config)));
        installed = tracing::subscriber::set_global_default(subscriber).is_ok();
    });

    if installed {
        if let Some(path) = config.file.as_ref() {
            tracing::debug!(target: "metals.config", path = %path.display(), "file logging enabled");
        }
    }
    installed
}

pub(crate) fn fmt_layer<S>(
    config: &LoggingConfig,
    writer: BoxMakeWriter,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    }
}

fn make_writer(config: &LoggingConfig) -> BoxMakeWriter {
    let file = config
        .file
        .as_ref()
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        })
        .map(|file| MutexFileMakeWriter {
            file: Arc::new(Mutex::new(file)),
        });

    match (config.stderr, file) {
        // `cargo test` only captures output written through `eprint!`.
        (true, Some(file)) if cfg!(debug_assertions) => {
            BoxMakeWriter::new((TestWriter::with_stderr).and(file))
        }
        (true, Some(file)) => BoxMakeWriter::new((io::stderr).and(file)),
        (true, None) if cfg!(debug_assertions) => BoxMakeWriter::new(TestWriter::with_stderr),
        (true, None) => BoxMakeWriter::new(io::stderr),
        (false, Some(file)) => BoxMakeWriter::new(file),
        (false, None) => BoxMakeWriter::new(io::sink),
    }
}

struct MutexFileMakeWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl<'a> MakeWriter<'a> for MutexFileMakeWriter {
    type Writer = MutexFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        // A poisoned lock only means another writer panicked mid-line.
        let guard = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        MutexFileWriter { guard }
    }
}

struct MutexFileWriter<'a> {
    guard: MutexGuard<'a, std::fs::File>,
}

impl Write for MutexFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}
