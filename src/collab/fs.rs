use std::path::Path;

use crate::collab::{FileSet, FileSystemCopier};

/// Copies and removes files on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCopier;

impl FileSystemCopier for FsCopier {
    fn remove_dir(&self, dir: &Path) -> anyhow::Result<()> {
        match std::fs::remove_dir_all(dir) {
            Ok(()) => {
                log::debug!("Removed {}", dir.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e).context(format!("removing {}", dir.display()))),
        }
    }

    fn copy(&self, files: &FileSet, dest: &Path) -> anyhow::Result<usize> {
        let relative_files = files.relative_files()?;
        for relative in &relative_files {
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(files.root.join(relative), &target)?;
            log::trace!("Copied {} to {}", relative.display(), target.display());
        }
        Ok(relative_files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn copy_keeps_relative_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("app");
        fs::create_dir_all(src.join("fonts/sub")).unwrap();
        fs::write(src.join("favicon.ico"), "ico").unwrap();
        fs::write(src.join("fonts/sub/a.woff"), "woff").unwrap();

        let dist = tmp.path().join("dist");
        let copied = FsCopier
            .copy(&FileSet::new(&src, ["favicon.ico", "fonts/**/*.woff"]), &dist)
            .unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dist.join("favicon.ico")).unwrap(), "ico");
        assert_eq!(fs::read_to_string(dist.join("fonts/sub/a.woff")).unwrap(), "woff");
    }

    #[test]
    fn removing_a_missing_dir_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        FsCopier.remove_dir(&tmp.path().join("dist")).unwrap();

        fs::create_dir_all(tmp.path().join("dist/css")).unwrap();
        FsCopier.remove_dir(&tmp.path().join("dist")).unwrap();
        assert!(!tmp.path().join("dist").exists());
    }
}
