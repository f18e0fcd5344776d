use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_TIME_COLUMN: &str = "time_iso8601";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Header field carrying the per-row timestamp.
    pub time_column: String,
    /// Report output directory; `None` means `<YYYY-MM-DD>_report` at run time.
    pub output_dir: Option<String>,
    /// Static assets staged beside the report.
    pub resources_dir: String,
    /// Pandoc binary name or path; resolved through PATH when not a path.
    pub pandoc_bin: String,
    pub title: String,
    /// Rows in the report's recent-days summary table.
    pub recent_days: usize,
    /// Whether to invoke pandoc for the secondary HTML output.
    pub html: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            output_dir: None,
            resources_dir: "resources".to_string(),
            pandoc_bin: "pandoc".to_string(),
            title: "Repository traffic statistics".to_string(),
            recent_days: 14,
            html: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialReportConfig {
    time_column: Option<String>,
    output_dir: Option<String>,
    resources_dir: Option<String>,
    pandoc_bin: Option<String>,
    title: Option<String>,
    recent_days: Option<usize>,
    html: Option<bool>,
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn validate(cfg: &ReportConfig) -> Result<()> {
    if cfg.time_column.trim().is_empty() {
        return Err(anyhow!("invalid time column: cannot be empty"));
    }
    if cfg.recent_days == 0 {
        return Err(anyhow!("invalid recent days: must be >= 1"));
    }
    if cfg.pandoc_bin.trim().is_empty() {
        return Err(anyhow!("invalid pandoc binary: cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(custom) = env::var("TRAFFIC_REPORT_CONFIG") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let home = dirs::home_dir()?;
    Some(home.join(".config").join("traffic-report.toml"))
}

fn apply_partial(base: &mut ReportConfig, parsed: PartialReportConfig) {
    if let Some(time_column) = parsed.time_column {
        base.time_column = time_column;
    }
    if let Some(output_dir) = parsed.output_dir {
        base.output_dir = Some(output_dir);
    }
    if let Some(resources_dir) = parsed.resources_dir {
        base.resources_dir = resources_dir;
    }
    if let Some(pandoc_bin) = parsed.pandoc_bin {
        base.pandoc_bin = pandoc_bin;
    }
    if let Some(title) = parsed.title {
        base.title = title;
    }
    if let Some(recent_days) = parsed.recent_days {
        base.recent_days = recent_days;
    }
    if let Some(html) = parsed.html {
        base.html = html;
    }
}

fn merge_file_config(base: &mut ReportConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialReportConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    apply_partial(base, parsed);
    Ok(())
}

/// Build the effective configuration: defaults, then the optional TOML file,
/// then environment overrides. CLI flags are layered on top by the caller —
/// nothing here is process-wide mutable state.
pub fn load_config() -> Result<ReportConfig> {
    let mut cfg = ReportConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.time_column = env_or_string("TRAFFIC_TIME_COLUMN", &cfg.time_column);
    if let Ok(v) = env::var("TRAFFIC_OUTPUT_DIR")
        && !v.trim().is_empty()
    {
        cfg.output_dir = Some(v.trim().to_string());
    }
    cfg.resources_dir = env_or_string("TRAFFIC_RESOURCES_DIR", &cfg.resources_dir);
    cfg.pandoc_bin = env_or_string("PANDOC_BIN", &cfg.pandoc_bin);
    cfg.title = env_or_string("TRAFFIC_TITLE", &cfg.title);
    cfg.recent_days = env_or_usize("TRAFFIC_RECENT_DAYS", cfg.recent_days);
    cfg.html = env_or_bool("TRAFFIC_HTML", cfg.html);

    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ReportConfig::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.time_column, DEFAULT_TIME_COLUMN);
    }

    #[test]
    fn validate_rejects_empty_time_column_and_zero_window() {
        let mut cfg = ReportConfig::default();
        cfg.time_column = "  ".to_string();
        assert!(validate(&cfg).is_err());

        let mut cfg = ReportConfig::default();
        cfg.recent_days = 0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn partial_file_config_overrides_only_present_keys() {
        let mut cfg = ReportConfig::default();
        let parsed: PartialReportConfig =
            toml::from_str("title = \"acme/widget traffic\"\nrecent_days = 7\n").expect("toml");
        apply_partial(&mut cfg, parsed);

        assert_eq!(cfg.title, "acme/widget traffic");
        assert_eq!(cfg.recent_days, 7);
        assert_eq!(cfg.pandoc_bin, "pandoc");
        assert!(cfg.html);
    }
}
