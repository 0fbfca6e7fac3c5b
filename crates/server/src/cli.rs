use std::path::PathBuf;

/// Command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// JSON config file; defaults apply when it does not exist.
    pub config: PathBuf,
    /// Directory holding `blocks.json`.
    pub data: PathBuf,
    /// Demo world radius, in chunks.
    pub radius: i32,
    /// Stop after this many ticks instead of waiting for Ctrl+C.
    pub ticks: Option<u64>,
}

impl Args {
    pub fn from_env() -> Self {
        Self::parse(std::env::args().collect())
    }

    pub fn parse(args: Vec<String>) -> Self {
        let value = |flag: &str| args.iter().skip_while(|a| *a != flag).nth(1).cloned();
        Self {
            config: value("--config").unwrap_or_else(|| "voxmap.json".into()).into(),
            data: value("--data").unwrap_or_else(|| "data".into()).into(),
            radius: value("--radius").and_then(|s| s.parse().ok()).unwrap_or(16),
            ticks: value("--ticks").and_then(|s| s.parse().ok()),
        }
    }
}
