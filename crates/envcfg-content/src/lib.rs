//! Configuration value model and multi-format rendering for envcfg
//!
//! A document is parsed once into an order-preserving [`ConfigValue`] tree
//! and rendered into one of five target formats:
//!
//! - **JSON**: direct re-serialization, any root
//! - **YAML**: block-style mappings and sequences
//! - **TOML**: tables and arrays of tables with two-pass key emission
//! - **HCL**: flat `.tfvars` assignments with inline nested expressions
//! - **ENV**: sorted `KEY=VALUE` lines for flat documents
//!
//! # Example
//!
//! ```
//! use envcfg_content::{ConfigValue, RenderFormat, render};
//!
//! let doc = ConfigValue::parse(r#"{"udp_trackers": [{"bind_address": "0.0.0.0:6969"}]}"#)?;
//! let toml = render(&doc, RenderFormat::Toml)?;
//! assert_eq!(toml, "[[udp_trackers]]\nbind_address = \"0.0.0.0:6969\"\n");
//! # Ok::<(), envcfg_content::Error>(())
//! ```

pub mod error;
pub mod format;
pub mod handlers;
pub mod path;
pub mod render;
pub mod value;

pub use error::{Error, Result};
pub use format::{FormatRenderer, RenderFormat};
pub use path::{KeyPath, PathSegment};
pub use render::{RenderOptions, render, render_with, renderer_for};
pub use value::{ConfigValue, Object};
