//! Filters for project names.

use cruet::case::kebab::to_kebab_case;
use minijinja::Environment;

/// npm package names are lowercase and URL-safe; kebab case gives both.
pub fn package_name(name: &str) -> String {
    let kebab = to_kebab_case(name.trim());
    kebab
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
        .collect()
}

pub fn register(env: &mut Environment<'_>) {
    env.add_filter("package_name", package_name);
}
