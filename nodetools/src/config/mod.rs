mod error;
mod merged;
mod nodetools_toml;

pub use merged::{Settings, validate_site_uri};
