//! Native asset steps: stylesheet concatenation, reference injection,
//! bundling and the final HTML pass.
//!
//! Pages mark where references go with comment blocks:
//!
//! ```html
//! <!-- inject:css -->
//! <!-- endinject -->
//! ```
//!
//! `inject:js` works the same way. Blocks written by the vendor injector
//! (`<!-- bower:css -->` ... `<!-- endbower -->`) are bundled too.

use indexmap::IndexSet;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::collab::{AssetKind, ContentHasher, FileSet, Minifier};
use crate::constants::layout;
use crate::ext::{relativize, PathExt};

const BLOCK_PATTERN: &str =
    r"(?s)<!--\s*(inject|bower):(css|js)\s*-->(.*?)<!--\s*end(?:inject|bower)\s*-->";
const INJECT_CSS_PATTERN: &str = r"(?s)<!--\s*inject:css\s*-->(.*?)<!--\s*endinject\s*-->";
const INJECT_JS_PATTERN: &str = r"(?s)<!--\s*inject:js\s*-->(.*?)<!--\s*endinject\s*-->";
const REFERENCE_PATTERN: &str = r#"(?:href|src)\s*=\s*"([^"]+)""#;
const REMOVE_PATTERN: &str = r"(?s)<!--\s*removeIf\(build\)\s*-->.*?<!--\s*endRemoveIf\(build\)\s*-->";

/// Bundle file names relative to the build output, shared between the
/// bundling and finalizing steps through a manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundles {
    pub css: Option<String>,
    pub js: Option<String>,
}

impl Bundles {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading bundle manifest {}: {e}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn write_if_changed(path: &Path, content: &str) -> anyhow::Result<bool> {
    if std::fs::read_to_string(path).is_ok_and(|old| old == content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(true)
}

/// Concatenates plain stylesheets into `out_file`.
pub fn concat_styles(entries: &FileSet, out_file: &Path) -> anyhow::Result<usize> {
    let files = entries.files()?;
    let mut combined = String::new();
    for file in &files {
        combined.push_str(&std::fs::read_to_string(file)?);
        if !combined.ends_with('\n') {
            combined.push('\n');
        }
    }
    write_if_changed(out_file, &combined)?;
    log::info!("Concatenated {} stylesheet(s) into {}", files.len(), out_file.display());
    Ok(files.len())
}

/// Replaces the body of the first block matched by `block` with `tags`, one
/// per line at the opening marker's indentation. `None` when the page has no
/// such block.
fn replace_block(html: &str, block: &Regex, tags: &[String]) -> Option<String> {
    let caps = block.captures(html)?;
    let begin = caps.get(0)?.start();
    let body = caps.get(1)?;

    let line_start = html[..begin].rfind('\n').map_or(0, |i| i + 1);
    let indent: String =
        html[line_start..begin].chars().take_while(|c| c.is_whitespace()).collect();

    let mut out = String::with_capacity(html.len());
    out.push_str(&html[..body.start()]);
    out.push('\n');
    for tag in tags {
        out.push_str(&indent);
        out.push_str(tag);
        out.push('\n');
    }
    out.push_str(&indent);
    out.push_str(&html[body.end()..]);
    Some(out)
}

fn reference(page_dir: &Path, file: &Path) -> anyhow::Result<String> {
    relativize(page_dir, page_dir, file)
        .map(|path| path.to_slash_string())
        .ok_or_else(|| {
            anyhow::anyhow!("cannot reference {} from {}", file.display(), page_dir.display())
        })
}

/// Writes `<link>`/`<script>` references to every stylesheet and script into
/// the injection blocks of each page, relative to the page. `extra_js` is
/// appended verbatim to the script block. Returns the number of pages changed.
pub fn inject_assets(
    pages: &FileSet,
    styles: &FileSet,
    scripts: &FileSet,
    extra_js: Option<&str>,
) -> anyhow::Result<usize> {
    let css_block = Regex::new(INJECT_CSS_PATTERN)?;
    let js_block = Regex::new(INJECT_JS_PATTERN)?;
    let style_files = styles.files()?;
    let script_files = scripts.files()?;
    let mut changed = 0;

    for page in pages.files()? {
        let page_dir = page.parent().unwrap_or(&pages.root);
        let html = std::fs::read_to_string(&page)?;

        let css_tags = style_files
            .iter()
            .map(|file| Ok(format!("<link rel=\"stylesheet\" href=\"{}\">", reference(page_dir, file)?)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let mut js_tags = script_files
            .iter()
            .map(|file| Ok(format!("<script src=\"{}\"></script>", reference(page_dir, file)?)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        js_tags.extend(extra_js.map(str::to_string));

        let mut updated = html.clone();
        if let Some(next) = replace_block(&updated, &css_block, &css_tags) {
            updated = next;
        }
        if let Some(next) = replace_block(&updated, &js_block, &js_tags) {
            updated = next;
        }

        if updated != html && write_if_changed(&page, &updated)? {
            log::debug!("Injected references into {}", page.display());
            changed += 1;
        }
    }

    log::info!("Injected {} stylesheet(s) and {} script(s) into {changed} page(s)", style_files.len(), script_files.len());
    Ok(changed)
}

fn is_external(url: &str) -> bool {
    url.contains("://") || url.starts_with("//") || url.starts_with('/') || url.starts_with("data:")
}

fn bundle_name(base: &str, hash: Option<&str>) -> String {
    match (hash, base.rsplit_once('.')) {
        (Some(hash), Some((stem, ext))) => format!("{stem}.{hash}.{ext}"),
        _ => base.to_string(),
    }
}

/// Concatenates and minifies every local stylesheet and script referenced
/// from the reference blocks of the pages, writes one bundle per kind below
/// `dest` and records the bundle names in `manifest`.
pub fn bundle(
    pages: &FileSet,
    dest: &Path,
    manifest: &Path,
    revision_hash: bool,
    minifier: &dyn Minifier,
    hasher: &dyn ContentHasher,
) -> anyhow::Result<Bundles> {
    let block = Regex::new(BLOCK_PATTERN)?;
    let attr = Regex::new(REFERENCE_PATTERN)?;

    let mut css: IndexSet<PathBuf> = IndexSet::new();
    let mut js: IndexSet<PathBuf> = IndexSet::new();
    for page in pages.files()? {
        let page_dir = page.parent().unwrap_or(&pages.root).to_path_buf();
        let html = std::fs::read_to_string(&page)?;
        for caps in block.captures_iter(&html) {
            let target = if &caps[2] == "css" { &mut css } else { &mut js };
            for reference in attr.captures_iter(&caps[3]) {
                let url = &reference[1];
                if is_external(url) {
                    log::debug!("Leaving external reference {url} out of the bundle");
                    continue;
                }
                target.insert(page_dir.join(url).normalize());
            }
        }
    }

    let write_bundle = |files: &IndexSet<PathBuf>, kind: AssetKind, base: &str| -> anyhow::Result<Option<String>> {
        if files.is_empty() {
            return Ok(None);
        }
        let mut combined = String::new();
        for file in files {
            let content = std::fs::read_to_string(file)
                .map_err(|e| anyhow::anyhow!("reading {}: {e}", file.display()))?;
            combined.push_str(&content);
            combined.push('\n');
        }
        let minified = minifier.minify(kind, &combined)?;
        let hash = revision_hash.then(|| hasher.hash(minified.as_bytes()));
        let name = bundle_name(base, hash.as_deref());
        write_if_changed(&dest.join(&name), &minified)?;
        log::info!("Bundled {} file(s) into {name}", files.len());
        Ok(Some(name))
    };

    let bundles = Bundles {
        css: write_bundle(&css, AssetKind::Css, layout::CSS_BUNDLE)?,
        js: write_bundle(&js, AssetKind::Js, layout::JS_BUNDLE)?,
    };
    bundles.save(manifest)?;
    Ok(bundles)
}

/// Writes each page to `dest` with its reference blocks collapsed onto the
/// bundles, build-only sections removed and the markup minified.
pub fn finalize(
    pages: &FileSet,
    dest: &Path,
    bundles: &Bundles,
    absolute_paths: bool,
    minifier: &dyn Minifier,
) -> anyhow::Result<usize> {
    let block = Regex::new(BLOCK_PATTERN)?;
    let remove = Regex::new(REMOVE_PATTERN)?;
    let relative_pages = pages.relative_files()?;

    for relative in &relative_pages {
        let html = std::fs::read_to_string(pages.root.join(relative))?;
        let target = dest.join(relative);
        let target_dir = target.parent().unwrap_or(dest).to_path_buf();

        let url = |name: &str| -> String {
            if absolute_paths {
                format!("/{name}")
            } else {
                relativize(dest, &target_dir, Path::new(name))
                    .map(|path| path.to_slash_string())
                    .unwrap_or_else(|| name.to_string())
            }
        };
        let css_tag = bundles.css.as_deref().map(|name| format!("<link rel=\"stylesheet\" href=\"{}\">", url(name)));
        let js_tag = bundles.js.as_deref().map(|name| format!("<script src=\"{}\"></script>", url(name)));

        let (mut css_done, mut js_done) = (false, false);
        let collapsed = block.replace_all(&html, |caps: &Captures| {
            let (done, tag) = if &caps[2] == "css" {
                (&mut css_done, &css_tag)
            } else {
                (&mut js_done, &js_tag)
            };
            if *done {
                return String::new();
            }
            *done = true;
            tag.clone().unwrap_or_default()
        });
        let cleaned = remove.replace_all(&collapsed, "");

        let minified = minifier.minify(AssetKind::Html, &cleaned)?;
        write_if_changed(&target, &minified)?;
        log::debug!("Finalized {}", target.display());
    }

    log::info!("Finalized {} page(s)", relative_pages.len());
    Ok(relative_pages.len())
}
