use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const FRAGMENT: &str = "\
time_iso8601,views_total,views_unique,clones_total,clones_unique
2020-12-01T00:00:00+00:00,120,30,10,4
2020-12-02T00:00:00+00:00,90,22,73,20
";

fn write_fake_pandoc(bin_path: &Path) {
    let script = r#"#!/usr/bin/env bash
set -euo pipefail

out=""
while [[ $# -gt 0 ]]; do
  if [[ "$1" == "-o" ]]; then
    out="$2"
    shift 2
    continue
  fi
  shift
done

echo "<html><body>fake pandoc output</body></html>" > "$out"
"#;
    fs::write(bin_path, script).expect("write fake pandoc");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(bin_path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(bin_path, perms).expect("chmod");
    }
}

fn find_report_md(outdir: &Path) -> Option<PathBuf> {
    for entry in fs::read_dir(outdir).expect("read outdir") {
        let path = entry.expect("entry").path();
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && name.ends_with("_report.md")
        {
            return Some(path);
        }
    }
    None
}

#[test]
fn report_writes_markdown_resources_and_html() {
    let tmp = tempdir().expect("tempdir");
    let csv = tmp.path().join("traffic.csv");
    fs::write(&csv, FRAGMENT).expect("write csv");

    let resources = tmp.path().join("resources");
    fs::create_dir_all(&resources).expect("mkdir resources");
    fs::write(resources.join("template.html"), "$body$").expect("write template");

    let pandoc = tmp.path().join("pandoc");
    write_fake_pandoc(&pandoc);

    let outdir = tmp.path().join("report_out");
    assert_cmd::cargo::cargo_bin_cmd!("traffic-report")
        .current_dir(tmp.path())
        .arg("report")
        .arg(&csv)
        .arg("--output-dir")
        .arg(&outdir)
        .arg("--resources-dir")
        .arg(&resources)
        .arg("--pandoc-bin")
        .arg(&pandoc)
        .args(["--title", "acme/widget traffic"])
        .assert()
        .success();

    let md_path = find_report_md(&outdir).expect("report markdown exists");
    let md = fs::read_to_string(&md_path).expect("read markdown");
    assert!(md.starts_with("% acme/widget traffic\n"));
    assert!(md.contains("# Views"));
    assert!(md.contains("# Clones"));
    assert!(md.contains("vegaEmbed('#chart_views_total'"));
    assert!(md.contains("| 2020-12-02 | 90 | 22 | 73 | 20 |"));

    assert!(outdir.join("resources/template.html").is_file());

    let html_path = md_path.with_extension("html");
    let html = fs::read_to_string(&html_path).expect("read html");
    assert!(html.contains("fake pandoc output"));
}

#[test]
fn skip_html_leaves_only_the_markdown_report() {
    let tmp = tempdir().expect("tempdir");
    let csv = tmp.path().join("traffic.csv");
    fs::write(&csv, FRAGMENT).expect("write csv");

    let outdir = tmp.path().join("report_out");
    assert_cmd::cargo::cargo_bin_cmd!("traffic-report")
        .current_dir(tmp.path())
        .arg("report")
        .arg(&csv)
        .arg("--output-dir")
        .arg(&outdir)
        .arg("--skip-html")
        .assert()
        .success();

    let md_path = find_report_md(&outdir).expect("report markdown exists");
    assert!(!md_path.with_extension("html").exists());
}

#[test]
fn report_replaces_a_stale_output_directory() {
    let tmp = tempdir().expect("tempdir");
    let csv = tmp.path().join("traffic.csv");
    fs::write(&csv, FRAGMENT).expect("write csv");

    let outdir = tmp.path().join("report_out");
    fs::create_dir_all(&outdir).expect("mkdir outdir");
    fs::write(outdir.join("stale.txt"), "old run").expect("write stale");

    assert_cmd::cargo::cargo_bin_cmd!("traffic-report")
        .current_dir(tmp.path())
        .arg("report")
        .arg(&csv)
        .arg("--output-dir")
        .arg(&outdir)
        .arg("--skip-html")
        .assert()
        .success();

    assert!(!outdir.join("stale.txt").exists());
    assert!(find_report_md(&outdir).is_some());
}

#[test]
fn report_rejects_an_output_path_that_is_a_file() {
    let tmp = tempdir().expect("tempdir");
    let csv = tmp.path().join("traffic.csv");
    fs::write(&csv, FRAGMENT).expect("write csv");

    let outdir = tmp.path().join("not_a_dir");
    fs::write(&outdir, "plain file").expect("write file");

    assert_cmd::cargo::cargo_bin_cmd!("traffic-report")
        .current_dir(tmp.path())
        .arg("report")
        .arg(&csv)
        .arg("--output-dir")
        .arg(&outdir)
        .arg("--skip-html")
        .assert()
        .failure()
        .stderr(predicates::str::contains("does not point to a directory"));
}
