use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::{EnvFilter, Targets},
    fmt,
};

const DEFAULT_SECTION: &str = "default";

// -------- level helpers --------

fn parse_level_filter(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        // empty or unknown
        _ => LevelFilter::INFO,
    }
}

/// Returns true if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || (target.starts_with(crate_name) && target[crate_name.len()..].starts_with("::"))
}

// -------- rotating writer for files --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

// A writer handle that may be None (drops writes)
struct RoutedWriter(Option<RotWriter>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Route log records to different files by target prefix.
#[derive(Default)]
struct MultiFileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl MultiFileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(crate_name, _)| matches_crate_prefix(target, crate_name))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for MultiFileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.resolve_for(meta.target()))
    }
}

// -------- path resolution helpers --------

/// Resolve a log file path against `base_dir` (home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Create a rotating writer for log files, ensuring the parent directory exists.
fn create_rotating_writer_at_path(
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

fn create_file_writer(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(
        &log_path,
        max_bytes as usize,
        section.max_backups.unwrap_or(3),
    ) {
        Ok(writer) => Some(writer),
        Err(e) => {
            eprintln!(
                "Failed to init log file for '{}': {} ({})",
                name,
                log_path.to_string_lossy(),
                e
            );
            None
        }
    }
}

// -------- filters --------

/// Console directives: the "default" section sets the global level,
/// every other section adds a `crate=level` directive.
fn console_directives(cfg: &LoggingConfig) -> String {
    let default_level = cfg
        .get(DEFAULT_SECTION)
        .map(|s| parse_level_filter(&s.console_level))
        .unwrap_or(LevelFilter::INFO);

    let mut directives = vec![default_level.to_string().to_ascii_lowercase()];
    let mut crates: Vec<_> = cfg
        .iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .collect();
    crates.sort_by(|a, b| a.0.cmp(b.0));
    for (name, section) in crates {
        let level = parse_level_filter(&section.console_level);
        directives.push(format!("{}={}", name, level.to_string().to_ascii_lowercase()));
    }
    directives.join(",")
}

fn file_targets(cfg: &LoggingConfig, router: &MultiFileRouter) -> Targets {
    let default_level = match (router.default.as_ref(), cfg.get(DEFAULT_SECTION)) {
        (Some(_), Some(section)) => parse_level_filter(&section.file_level),
        _ => LevelFilter::OFF,
    };

    let mut targets = Targets::new().with_default(default_level);
    for (name, section) in cfg {
        if name == DEFAULT_SECTION {
            continue;
        }
        let level = if router.by_prefix.contains_key(name) {
            parse_level_filter(&section.file_level)
        } else {
            // no own file: falls through to the default file
            default_level
        };
        targets = targets.with_target(name.clone(), level);
    }
    targets
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> MultiFileRouter {
    let mut router = MultiFileRouter::default();
    for (name, section) in cfg {
        let Some(writer) = create_file_writer(name, section, base_dir) else {
            continue;
        };
        if name == DEFAULT_SECTION {
            router.default = Some(writer);
        } else {
            router.by_prefix.insert(name.clone(), writer);
        }
    }
    router
}

// -------- public init --------

/// Initialize logging from a configuration.
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths (usually server.home_dir)
///
/// `RUST_LOG`, when set, replaces the console directives derived from `cfg`.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    let console_filter = match std::env::var("RUST_LOG") {
        Ok(raw) if !raw.trim().is_empty() => EnvFilter::new(raw),
        _ => EnvFilter::new(console_directives(cfg)),
    };

    let console_layer = fmt::layer()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_filter);

    let router = build_file_router(cfg, base_dir);
    let file_layer = if router.is_empty() {
        None
    } else {
        let targets = file_targets(cfg, &router);
        Some(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router)
                .with_filter(targets),
        )
    };

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

// =================== tests ===================
