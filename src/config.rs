//! Configuration module
//!
//! Command line arguments, serve-directory resolution and validation,
//! and the shared immutable application state.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::http::CacheRules;
use crate::logger::Logger;

/// File that must exist at the root of the serve directory.
///
/// Serving the wrong directory would quietly break service worker
/// updates for every connected client, so startup refuses to continue
/// without it.
pub const MARKER_FILE: &str = "sw.js";

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Serve a web app with cache-override headers for its critical files")]
pub struct Args {
    /// Port to serve on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Directory to serve (default: parent of this executable's directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Log all requests, not just errors
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved and validated serve configuration
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Canonicalized web app root directory
    pub root: PathBuf,
    pub port: u16,
    pub verbose: bool,
}

impl ServeConfig {
    /// Resolve and validate the directory named by the arguments.
    ///
    /// Fails before any socket is bound if the directory does not hold
    /// the marker file.
    pub fn resolve(args: &Args) -> io::Result<Self> {
        let root = match &args.dir {
            Some(dir) => dir.clone(),
            None => default_serve_dir()?,
        };
        validate_root(&root)?;
        Ok(Self {
            root: root.canonicalize()?,
            port: args.port,
            verbose: args.verbose,
        })
    }

    /// Address to bind: all interfaces on the configured port
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

/// Parent directory of the executable's own directory.
///
/// The binary conventionally lives in a tool subdirectory of the web
/// app checkout, so the directory above it is the app root.
fn default_serve_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "cannot determine default serve directory from executable location",
            )
        })
}

/// Check that the serve directory holds the marker file.
pub fn validate_root(root: &Path) -> io::Result<()> {
    if root.join(MARKER_FILE).is_file() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "{MARKER_FILE} not found in {}. Make sure you are serving the web app root directory.",
                root.display()
            ),
        ))
    }
}

/// Shared application state, read-only after startup
pub struct AppState {
    pub config: ServeConfig,
    pub rules: CacheRules,
    pub logger: Logger,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServeConfig) -> Self {
        let logger = Logger::new(config.verbose);
        Self {
            config,
            rules: CacheRules::default(),
            logger,
        }
    }
}
