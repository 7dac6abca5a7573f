use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::layout;
use crate::options::OptionSet;

/// Folder names below the source directory. An empty name disables the folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Folders {
    pub fonts: String,
    pub icons: String,
    pub images: String,
    pub pictures: String,
    pub scripts: String,
    pub templates: String,
    pub styles: String,
    pub vendors: String,
}

impl Default for Folders {
    fn default() -> Self {
        Self {
            fonts: String::new(),
            icons: String::new(),
            images: String::new(),
            pictures: String::new(),
            scripts: layout::SCRIPTS.to_string(),
            templates: String::new(),
            styles: layout::STYLES.to_string(),
            vendors: layout::VENDORS.to_string(),
        }
    }
}

/// Returns the folder name when it is set.
pub fn folder(name: &str) -> Option<&str> {
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

impl Folders {
    /// Image folders that are set, in declaration order.
    pub fn image_folders(&self) -> Vec<&str> {
        [&self.icons, &self.images, &self.pictures]
            .into_iter()
            .filter_map(|name| folder(name))
            .collect()
    }
}

/// Where sources, build output and intermediate files live, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub src: PathBuf,
    pub dist: PathBuf,
    pub tmp: PathBuf,
    pub folders: Folders,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            src: PathBuf::from(layout::SRC),
            dist: PathBuf::from(layout::DIST),
            tmp: PathBuf::from(layout::TMP),
            folders: Folders::default(),
        }
    }
}

impl Layout {
    /// Layout of a freshly generated project.
    pub fn for_options(options: &OptionSet) -> Self {
        let mut layout = Self::default();
        if options.template_engine.is_active() {
            layout.folders.templates = layout::TEMPLATES.to_string();
        }
        if !options.include_helper_libs {
            layout.folders.vendors = String::new();
        }
        layout
    }

    pub fn src_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.src)
    }

    pub fn dist_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.dist)
    }

    /// Intermediate output of a build, next to the sources.
    pub fn build_tmp_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.tmp)
    }

    /// Intermediate output while watching. It lives inside the source
    /// directory so the development server can reach it.
    pub fn watch_tmp_dir(&self, root: &Path) -> PathBuf {
        self.src_dir(root).join(&self.tmp)
    }

    /// Absolute path of a source folder, if the folder is set.
    pub fn src_folder(&self, root: &Path, name: &str) -> Option<PathBuf> {
        folder(name).map(|name| self.src_dir(root).join(name))
    }

    /// The vendor directory, if the folder is set and exists on disk.
    pub fn existing_vendor_dir(&self, root: &Path) -> Option<PathBuf> {
        self.src_folder(root, &self.folders.vendors).filter(|dir| dir.is_dir())
    }
}
