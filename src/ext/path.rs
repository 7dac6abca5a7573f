use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Extension trait for Path to provide convenient string conversion methods
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use lander::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("test");
    /// assert_eq!(path.to_str_checked().unwrap(), "test");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Renders the path with `/` separators regardless of platform, as needed
    /// for URLs written into HTML.
    ///
    /// # Examples
    /// ```
    /// use lander::ext::PathExt;
    /// use std::path::Path;
    ///
    /// assert_eq!(Path::new("styles/main.css").to_slash_string(), "styles/main.css");
    /// ```
    fn to_slash_string(&self) -> String;

    /// Lexically resolves `.` and `..` components without touching the filesystem.
    fn normalize(&self) -> PathBuf;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_slash_string(&self) -> String {
        self.components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                Component::RootDir => Some(String::new()),
                Component::CurDir | Component::Prefix(_) => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    fn normalize(&self) -> PathBuf {
        let mut out = PathBuf::new();
        for component in self.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    let can_pop = matches!(
                        out.components().next_back(),
                        Some(Component::Normal(_))
                    );
                    if can_pop {
                        out.pop();
                    } else if !out.has_root() {
                        out.push("..");
                    }
                }
                other => out.push(other.as_os_str()),
            }
        }
        out
    }
}

/// Rewrites `path`, given relative to `from_dir`, into a path that resolves to
/// the same file when read relative to `to_dir`.
///
/// Both directories must be expressed against the same base (both relative to
/// the project root, or both absolute). Returns `None` when `to_dir` climbs
/// above the common base in a way that cannot be expressed lexically.
///
/// # Examples
/// ```
/// use lander::ext::relativize;
/// use std::path::{Path, PathBuf};
///
/// let rel = relativize(Path::new("app"), Path::new("app/pages"), Path::new("styles/main.css"));
/// assert_eq!(rel, Some(PathBuf::from("../styles/main.css")));
/// ```
pub fn relativize(from_dir: &Path, to_dir: &Path, path: &Path) -> Option<PathBuf> {
    let target = if path.is_absolute() { path.normalize() } else { from_dir.join(path).normalize() };
    let base = to_dir.normalize();

    if target.has_root() != base.has_root() {
        return None;
    }

    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for component in &base_parts[common..] {
        match component {
            Component::Normal(_) => result.push(".."),
            // The remaining base climbs above the shared prefix; there is no name to descend back into.
            _ => return None,
        }
    }
    for component in &target_parts[common..] {
        result.push(component.as_os_str());
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_str_checked_valid() {
        let path = Path::new("valid_path");
        assert_eq!(path.to_str_checked().unwrap(), "valid_path");
    }

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(Path::new("app/./styles/../scripts").normalize(), PathBuf::from("app/scripts"));
        assert_eq!(Path::new("../app").normalize(), PathBuf::from("../app"));
    }

    #[test]
    fn relativize_same_directory() {
        let rel = relativize(Path::new("app"), Path::new("app"), Path::new("scripts/main.js"));
        assert_eq!(rel, Some(PathBuf::from("scripts/main.js")));
    }

    #[test]
    fn relativize_into_sibling_tree() {
        let rel = relativize(Path::new("."), Path::new("app"), Path::new(".tmp/style.css"));
        assert_eq!(rel, Some(PathBuf::from("../.tmp/style.css")));
    }

    #[test]
    fn relativize_from_nested_page() {
        let rel = relativize(
            Path::new("dist"),
            Path::new("dist/blog/posts"),
            Path::new("styles/main.css"),
        );
        assert_eq!(rel, Some(PathBuf::from("../../styles/main.css")));
    }

    #[test]
    fn relativize_absolute_paths() {
        let rel = relativize(
            Path::new("/project/app"),
            Path::new("/project/dist"),
            Path::new("/project/app/scripts/main.js"),
        );
        assert_eq!(rel, Some(PathBuf::from("../app/scripts/main.js")));
    }

    #[test]
    fn relativize_rejects_unreachable_base() {
        assert_eq!(relativize(Path::new("app"), Path::new("../elsewhere"), Path::new("a.css")), None);
        assert_eq!(relativize(Path::new("/abs"), Path::new("rel"), Path::new("a.css")), None);
    }

    #[test]
    fn slash_string_uses_forward_slashes() {
        let path: PathBuf = ["..", "styles", "main.css"].iter().collect();
        assert_eq!(path.to_slash_string(), "../styles/main.css");
    }
}
