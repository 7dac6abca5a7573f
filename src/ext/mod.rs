/// Extension traits and helpers for built-in Rust types.
///
/// Each extension lives in its own file named after the type it extends:
/// - `path.rs` - Extensions for `std::path::Path` plus path relativization
pub mod path;

pub use path::{relativize, PathExt};
