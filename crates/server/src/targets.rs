//! Target list resolution and `host[:port]` parsing.

use std::fmt;
use std::path::Path;

pub const DEFAULT_PORT: i32 = 443;

/// A candidate endpoint. Nothing about it has been checked against DNS yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub host: String,
    pub port: i32,
}

impl Target {
    pub fn new(host: impl Into<String>, port: i32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Merge the explicit target list with the lines of `file_path`.
///
/// Explicit entries come first, in order, followed by file lines in file order. Duplicates
/// are kept. A file that cannot be read contributes nothing.
#[tracing::instrument(skip(explicit))]
pub async fn resolve(explicit: &[String], file_path: Option<&Path>) -> Vec<String> {
    let mut out: Vec<String> = explicit
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(path) = file_path {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => out.extend(file_lines(&contents)),
            Err(e) => {
                tracing::warn!(
                    name = "targets.resolve.file_unreadable",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    path = %path.display(),
                    error = %e,
                    message = "Target file could not be read, continuing without it"
                );
            }
        }
    }

    out
}

fn file_lines(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
}

/// Parse a `host`, `host:port`, `[v6]` or `[v6]:port` candidate.
///
/// Returns `None` for anything that should silently not be probed: blanks, comments, an
/// empty host, or a port segment that is not a 32-bit integer. Out of range ports such as
/// `70000` or `-1` are kept so the probe reports them. Only the first colon of an
/// unbracketed candidate separates host and port, so bare IPv6 literals are rejected.
pub fn parse_target(candidate: &str) -> Option<Target> {
    let s = candidate.trim();
    if s.is_empty() || s.starts_with('#') {
        return None;
    }

    if let Some(rest) = s.strip_prefix('[') {
        let (host, after) = rest.split_once(']')?;
        let host = host.trim();
        if host.is_empty() {
            return None;
        }
        let port = match after.trim() {
            "" => DEFAULT_PORT,
            p => p.strip_prefix(':')?.trim().parse().ok()?,
        };
        return Some(Target::new(host, port));
    }

    let (host, port) = match s.split_once(':') {
        Some((host, port)) => (host.trim(), port.trim().parse().ok()?),
        None => (s, DEFAULT_PORT),
    };
    if host.is_empty() {
        return None;
    }
    Some(Target::new(host, port))
}

/// Parse every candidate, dropping the ones [`parse_target`] rejects.
pub fn parse_targets<S: AsRef<str>>(candidates: &[S]) -> Vec<Target> {
    candidates
        .iter()
        .filter_map(|c| parse_target(c.as_ref()))
        .collect()
}
