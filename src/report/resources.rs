use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Copy the static resources tree into the output directory. Returns the
/// number of files staged.
pub fn copy_resources(src: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest).with_context(|| format!("failed to create {}", dest.display()))?;

    let mut copied = 0usize;
    let read_dir = fs::read_dir(src).with_context(|| format!("failed to read {}", src.display()))?;
    for entry in read_dir {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if from.is_dir() {
            copied += copy_resources(&from, &to)?;
        } else {
            fs::copy(&from, &to)
                .with_context(|| format!("failed to copy {}", from.display()))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::copy_resources;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn copies_nested_trees_and_counts_files() {
        let tmp = tempdir().expect("tempdir");
        let src = tmp.path().join("resources");
        fs::create_dir_all(src.join("css")).expect("mkdir");
        fs::write(src.join("template.html"), "<html></html>").expect("write");
        fs::write(src.join("css/style.css"), "body {}").expect("write");

        let dest = tmp.path().join("out/resources");
        let copied = copy_resources(&src, &dest).expect("copy");

        assert_eq!(copied, 2);
        assert!(dest.join("template.html").is_file());
        assert!(dest.join("css/style.css").is_file());
    }
}
