use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::load_and_reconcile;
use crate::config::{self, ReportConfig};
use crate::report::{markdown, pandoc, resources};

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub csv_paths: Vec<String>,
    pub output_dir: Option<String>,
    pub resources_dir: Option<String>,
    pub pandoc_bin: Option<String>,
    pub title: Option<String>,
    pub time_column: Option<String>,
    pub skip_html: bool,
}

fn apply_cli_overrides(cfg: &mut ReportConfig, opts: &ReportOptions) {
    if let Some(output_dir) = &opts.output_dir {
        cfg.output_dir = Some(output_dir.clone());
    }
    if let Some(resources_dir) = &opts.resources_dir {
        cfg.resources_dir = resources_dir.clone();
    }
    if let Some(pandoc_bin) = &opts.pandoc_bin {
        cfg.pandoc_bin = pandoc_bin.clone();
    }
    if let Some(title) = &opts.title {
        cfg.title = title.clone();
    }
    if let Some(time_column) = &opts.time_column {
        cfg.time_column = time_column.clone();
    }
    if opts.skip_html {
        cfg.html = false;
    }
}

/// Stage a clean output directory: an existing directory at the path is
/// removed wholesale, anything else at the path is an error.
fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        if !output_dir.is_dir() {
            anyhow::bail!(
                "output directory path does not point to a directory: {}",
                output_dir.display()
            );
        }
        log::info!("remove output directory: {}", output_dir.display());
        fs::remove_dir_all(output_dir)
            .with_context(|| format!("failed to remove {}", output_dir.display()))?;
    }

    log::info!("create output directory: {}", output_dir.display());
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    Ok(())
}

/// Full pipeline: reconcile the fragments, write the Markdown report with
/// embedded chart specs, stage resources, and (unless disabled) run pandoc
/// for the HTML rendition.
pub fn run(opts: &ReportOptions) -> Result<()> {
    let mut cfg = config::load_config()?;
    apply_cli_overrides(&mut cfg, opts);

    let series = load_and_reconcile(&opts.csv_paths, &cfg.time_column)?;

    let now = Utc::now();
    let today = now.format("%Y-%m-%d").to_string();
    let output_dir = PathBuf::from(
        cfg.output_dir
            .clone()
            .unwrap_or_else(|| format!("{today}_report")),
    );
    prepare_output_dir(&output_dir)?;

    let resources_src = PathBuf::from(&cfg.resources_dir);
    let staged_resources = output_dir.join("resources");
    if resources_src.is_dir() {
        let copied = resources::copy_resources(&resources_src, &staged_resources)?;
        log::info!(
            "copied {copied} resource files into {}",
            staged_resources.display()
        );
    } else {
        log::info!(
            "resources directory {} not found, skipping",
            resources_src.display()
        );
    }

    let report_md = markdown::render(&markdown::ReportInputs {
        series: &series,
        title: &cfg.title,
        generated_at: now,
        recent_days: cfg.recent_days,
    })?;

    let md_path = output_dir.join(format!("{today}_report.md"));
    log::info!("write generated Markdown report to: {}", md_path.display());
    fs::write(&md_path, report_md)
        .with_context(|| format!("failed to write {}", md_path.display()))?;

    if !cfg.html {
        log::info!("HTML rendition disabled, done");
        return Ok(());
    }

    let html_path = md_path.with_extension("html");
    let template = staged_resources.join("template.html");
    let template = template.is_file().then_some(template);
    log::info!("run pandoc for the HTML rendition");
    pandoc::render_html(
        &cfg.pandoc_bin,
        &md_path,
        &html_path,
        template.as_deref(),
    )?;
    log::info!("wrote HTML report to: {}", html_path.display());

    Ok(())
}
