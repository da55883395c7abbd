//! Logger module
//!
//! Startup/shutdown banners and per-request access logging. Successful
//! responses are suppressed unless verbose mode is on, so routine
//! traffic stays quiet while 4xx/5xx responses always show up. The
//! verbose flag is fixed when the logger is built.

use chrono::Local;

use crate::config::ServeConfig;
use crate::http::CacheRules;

/// Per-request logger with status-aware suppression
#[derive(Debug, Clone)]
pub struct Logger {
    verbose: bool,
}

impl Logger {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Whether a response with this status gets an access log line
    #[must_use]
    pub const fn should_log(&self, status: u16) -> bool {
        self.verbose || status >= 400
    }

    /// Emit one access log line for a finished response.
    ///
    /// Error responses go to stderr so they stay visible when stdout is
    /// redirected; everything else goes to stdout.
    pub fn log_access(&self, entry: &AccessLogEntry) {
        if !self.should_log(entry.status) {
            return;
        }
        let line = entry.format_combined();
        if entry.status >= 400 {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn log_error(&self, message: &str) {
        eprintln!("[ERROR] {message}");
    }

    pub fn log_warning(&self, message: &str) {
        eprintln!("[WARN] {message}");
    }
}

/// Access log entry containing request and response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, ...)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
}

impl AccessLogEntry {
    /// Create a new access log entry with the current timestamp
    #[must_use]
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
        }
    }

    /// Apache/Nginx Combined Log Format
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}{} HTTP/{}\" {} {} \"{}\" \"{}\"",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.query
                .as_ref()
                .map(|q| format!("?{q}"))
                .unwrap_or_default(),
            self.http_version,
            self.status,
            self.body_bytes,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }
}

/// Print the startup banner
pub fn log_server_start(config: &ServeConfig, rules: &CacheRules) {
    println!("======================================");
    println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Serving: {}", config.root.display());
    println!("URL:     http://localhost:{}", config.port);
    println!();
    println!(
        "Cache-Control: no-cache, no-store applied to: {}",
        rules.no_cache_summary()
    );
    println!(
        "Cache-Control: no-cache (revalidate) applied to: {}",
        rules.revalidate_summary()
    );
    println!("Press Ctrl+C to stop.");
    println!("======================================\n");
}

/// Print the shutdown message
pub fn log_server_stop() {
    println!("\nServer stopped.");
}
