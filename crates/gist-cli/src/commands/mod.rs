//! CLI command implementations.

pub(crate) mod cache_path;
pub(crate) mod css;
pub(crate) mod process;

pub(crate) use cache_path::CachePathArgs;
pub(crate) use css::CssArgs;
pub(crate) use process::ProcessArgs;
