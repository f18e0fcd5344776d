use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolve the pandoc binary: an existing path is used as-is, anything else
/// is looked up on PATH.
fn resolve_pandoc_bin(configured: &str) -> Result<PathBuf> {
    let candidate = Path::new(configured);
    if candidate.exists() {
        return Ok(candidate.to_path_buf());
    }
    let found = which::which(configured)
        .with_context(|| format!("`{configured}` not found in PANDOC_BIN or PATH"))?;
    Ok(found)
}

/// Convert the Markdown report to a standalone HTML document.
///
/// Runs `pandoc --toc --standalone [--template=...] <md> -o <html>`. The
/// template is only passed when it exists in the staged resources, so a run
/// without resources still produces pandoc's default standalone layout.
pub fn render_html(
    configured_bin: &str,
    markdown_path: &Path,
    html_path: &Path,
    template_path: Option<&Path>,
) -> Result<()> {
    let bin = resolve_pandoc_bin(configured_bin)?;

    let mut cmd = Command::new(&bin);
    cmd.arg("--toc").arg("--standalone");
    if let Some(template) = template_path {
        let mut arg = std::ffi::OsString::from("--template=");
        arg.push(template);
        cmd.arg(arg);
    }
    cmd.arg(markdown_path).arg("-o").arg(html_path);

    let output = cmd
        .output()
        .with_context(|| format!("failed to run `{}`", bin.display()))?;

    if output.status.success() {
        return Ok(());
    }

    anyhow::bail!(
        "pandoc failed for {}\nstdout: {}\nstderr: {}",
        markdown_path.display(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
