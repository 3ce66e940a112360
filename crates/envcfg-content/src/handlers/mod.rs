//! Format renderers

mod env;
mod escape;
mod hcl;
mod json;
mod toml;
mod yaml;

pub use self::env::EnvRenderer;
pub use self::hcl::HclRenderer;
pub use self::json::JsonRenderer;
pub use self::toml::TomlRenderer;
pub use self::yaml::YamlRenderer;
