use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::config::LoggingConfig;

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

/// Unknown names fall back to INFO.
fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Filter for one sink: `level` by default, never more verbose than a target's ceiling.
fn sink_filter(level: LevelFilter, ceilings: &BTreeMap<String, String>) -> Targets {
    ceilings
        .iter()
        .fold(Targets::new().with_default(level), |targets, (target, ceiling)| {
            targets.with_target(target.clone(), parse_level(ceiling).min(level))
        })
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().map_err(poisoned)?.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().map_err(poisoned)?.flush()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> std::io::Error {
    std::io::Error::other("log writer mutex poisoned")
}

/// Absolute paths are kept; relative ones are joined onto `base_dir` (the server home).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Size-rotated file keeping at most `max_backups` rotated siblings.
fn open_rotating(
    log_path: &Path,
    max_bytes: usize,
    max_backups: usize,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_backups)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn file_writer(cfg: &LoggingConfig, base_dir: &Path) -> Option<RotWriter> {
    if cfg.file.trim().is_empty() || parse_level(&cfg.file_level) == LevelFilter::OFF {
        return None;
    }

    let log_path = resolve_log_path(&cfg.file, base_dir);
    let max_bytes = cfg.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let max_backups = cfg.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    match open_rotating(&log_path, max_bytes as usize, max_backups) {
        Ok(writer) => Some(writer),
        Err(e) => {
            // The subscriber is not installed yet.
            eprintln!("Failed to open log file '{}': {e}", log_path.display());
            None
        }
    }
}

/// Install the global subscriber.
///
/// Console output is human-readable (ANSI only on a terminal); the file sink
/// writes JSON lines. `log` records are bridged into `tracing` first.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    let _ = tracing_log::LogTracer::init();

    let console = fmt::layer()
        .with_ansi(atty::is(atty::Stream::Stdout))
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(sink_filter(parse_level(&cfg.console_level), &cfg.targets));

    let file = file_writer(cfg, base_dir).map(|writer| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(writer)
            .with_filter(sink_filter(parse_level(&cfg.file_level), &cfg.targets))
    });

    let _ = Registry::default().with(console).with(file).try_init();
}
