use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

/// Result of one catalog item (or dispatcher category) for summary reporting.
#[derive(Debug, Clone)]
pub struct ItemEntry {
    pub name: String,
    pub status: ItemStatus,
    pub message: Option<String>,
}

/// Status of a processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    /// Item was transferred (or already matched).
    Done,
    /// Operator declined the confirmation prompt.
    Declined,
    /// Source did not exist; item skipped.
    Missing,
    /// Dry-run: actions reported, nothing written.
    DryRun,
    /// Item failed; run continued.
    Failed,
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/homevault/run.log` (default `~/.cache/homevault/run.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
pub struct Logger {
    verbose: bool,
    items: std::cell::RefCell<Vec<ItemEntry>>,
    log_file: Option<PathBuf>,
}

/// Return the log file path under `$XDG_CACHE_HOME/homevault/` (or `~/.cache/homevault/`).
fn log_file_path() -> Option<PathBuf> {
    let cache_dir = std::env::var("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".cache")))
        .ok()?;
    let dir = cache_dir.join("homevault");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("run.log"))
}

/// Strip ANSI escape sequences from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm' (end of SGR sequence)
            for inner in chars.by_ref() {
                if inner == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl Logger {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let log_file = log_file_path();

        // Truncate and write header (new run = fresh log)
        if let Some(ref path) = log_file {
            let header = format!(
                "==========================================\n\
                 homevault {} {}\n\
                 ==========================================\n",
                env!("CARGO_PKG_VERSION"),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            );
            let _ = fs::write(path, header);
        }

        Self {
            verbose,
            items: std::cell::RefCell::new(Vec::new()),
            log_file,
        }
    }

    /// Append a line to the persistent log file.
    fn write_to_file(&self, level: &str, msg: &str) {
        if let Some(ref path) = self.log_file {
            if let Ok(mut f) = fs::OpenOptions::new().append(true).open(path) {
                let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
                let clean = strip_ansi(msg);
                let _ = writeln!(f, "{ts} {level} {clean}");
            }
        }
    }

    /// Logger writing to an explicit file, isolated from the shared cache
    /// location (parallel tests would truncate each other's logs).
    #[cfg(test)]
    fn with_log_file(verbose: bool, path: PathBuf) -> Self {
        let _ = fs::write(&path, "");
        Self {
            verbose,
            items: std::cell::RefCell::new(Vec::new()),
            log_file: Some(path),
        }
    }

    pub fn error(&self, msg: &str) {
        eprintln!("\x1b[31mERROR\x1b[0m {msg}");
        self.write_to_file("ERR", msg);
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("\x1b[33mWARN\x1b[0m  {msg}");
        self.write_to_file("WRN", msg);
    }

    pub fn stage(&self, msg: &str) {
        println!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m");
        self.write_to_file("STG", msg);
    }

    pub fn info(&self, msg: &str) {
        println!("  {msg}");
        self.write_to_file("INF", msg);
    }

    pub fn debug(&self, msg: &str) {
        if self.verbose {
            println!("  \x1b[2m{msg}\x1b[0m");
        }
        // Always log debug to file, even when not verbose on terminal
        self.write_to_file("DBG", msg);
    }

    pub fn dry_run(&self, msg: &str) {
        println!("  \x1b[33m[DRY RUN]\x1b[0m {msg}");
        self.write_to_file("DRY", msg);
    }

    /// Record an item result for the summary.
    pub fn record_item(&self, name: &str, status: ItemStatus, message: Option<&str>) {
        self.items.borrow_mut().push(ItemEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }

    /// Number of recorded items that failed.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.items
            .borrow()
            .iter()
            .filter(|e| e.status == ItemStatus::Failed)
            .count() as u32
    }

    /// Print the summary of all recorded items.
    pub fn print_summary(&self) {
        let items = self.items.borrow();
        if items.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");

        let mut done = 0u32;
        let mut declined = 0u32;
        let mut missing = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for item in items.iter() {
            let (icon, color) = match item.status {
                ItemStatus::Done => {
                    done += 1;
                    ("✓", "\x1b[32m")
                }
                ItemStatus::Declined => {
                    declined += 1;
                    ("·", "\x1b[2m")
                }
                ItemStatus::Missing => {
                    missing += 1;
                    ("○", "\x1b[33m")
                }
                ItemStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[33m")
                }
                ItemStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = match &item.message {
                Some(msg) => format!(" ({msg})"),
                None => String::new(),
            };

            let line = format!("{icon} {}{suffix}", item.name);
            println!("  {color}{line}\x1b[0m");
            self.write_to_file("INF", &line);
        }

        println!();
        let total = done + declined + missing + dry_run + failed;
        let totals = format!(
            "{total} items: {done} done, {declined} declined, {missing} missing, {dry_run} dry-run, {failed} failed"
        );
        println!(
            "  {total} items: \x1b[32m{done} done\x1b[0m, {declined} declined, \x1b[33m{missing} missing\x1b[0m, {dry_run} dry-run, \x1b[31m{failed} failed\x1b[0m"
        );
        self.write_to_file("INF", &totals);

        if let Some(path) = &self.log_file {
            println!("  \x1b[2mlog: {}\x1b[0m", path.display());
            self.write_to_file("INF", &format!("log: {}", path.display()));
        }
    }
}
