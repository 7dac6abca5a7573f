use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;

/// A glob-selected set of files below a root directory.
///
/// Patterns are matched against `/`-separated paths relative to `root`;
/// `*` does not cross directory boundaries, `**` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl FileSet {
    pub fn new<I, S>(root: impl Into<PathBuf>, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            include: include.into_iter().map(Into::into).collect(),
            exclude: Vec::new(),
        }
    }

    pub fn excluding<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(exclude.into_iter().map(Into::into));
        self
    }

    /// Whether a path relative to the root is selected.
    pub fn matches(&self, relative: &Path) -> Result<bool> {
        let include = build_globset(&self.include)?;
        let exclude = build_globset(&self.exclude)?;
        Ok(include.is_match(relative) && !exclude.is_match(relative))
    }

    /// Selected files as paths relative to the root, sorted. A missing root
    /// selects nothing.
    pub fn relative_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            log::debug!("File set root {} does not exist", self.root.display());
            return Ok(Vec::new());
        }
        let include = build_globset(&self.include)?;
        let exclude = build_globset(&self.exclude)?;

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if include.is_match(relative) && !exclude.is_match(relative) {
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Selected files as paths joined onto the root.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.relative_files()?.into_iter().map(|rel| self.root.join(rel)).collect())
    }
}

/// Compiles patterns with `*` confined to one path segment.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn selects_with_include_and_exclude() {
        let tmp = tempfile::tempdir().unwrap();
        for rel in ["index.html", "blog/post.html", "bower_components/lib/demo.html", "style.css"] {
            touch(tmp.path(), rel);
        }
        let set = FileSet::new(tmp.path(), ["**/*.html"]).excluding(["bower_components/**"]);
        assert_eq!(
            set.relative_files().unwrap(),
            [PathBuf::from("blog/post.html"), PathBuf::from("index.html")]
        );
    }

    #[test]
    fn single_star_stays_in_one_directory() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "a.css");
        touch(tmp.path(), "nested/b.css");
        let set = FileSet::new(tmp.path(), ["*.css"]);
        assert_eq!(set.relative_files().unwrap(), [PathBuf::from("a.css")]);
    }

    #[test]
    fn partials_are_skipped_by_negated_class() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "style.scss");
        touch(tmp.path(), "_vars.scss");
        touch(tmp.path(), "parts/_mixins.scss");
        let set = FileSet::new(tmp.path(), ["**/[!_]*.scss"]);
        assert_eq!(set.relative_files().unwrap(), [PathBuf::from("style.scss")]);
    }

    #[test]
    fn alternates_select_several_extensions() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "fonts/a.woff");
        touch(tmp.path(), "fonts/b.ttf");
        touch(tmp.path(), "fonts/readme.txt");
        let set = FileSet::new(tmp.path(), ["fonts/**/*.{eot,svg,ttf,woff}"]);
        assert_eq!(set.relative_files().unwrap().len(), 2);
    }

    #[test]
    fn missing_root_is_empty() {
        let set = FileSet::new("/definitely/not/here", ["**/*"]);
        assert!(set.files().unwrap().is_empty());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let set = FileSet::new(".", ["a[b"]);
        assert!(set.matches(Path::new("ab")).is_err());
    }
}
