extern crate serde;
extern crate serde_json;

extern crate itertools;
#[macro_use]
extern crate lazy_static;
extern crate regex;
#[macro_use]
extern crate tracing;
extern crate tracing_subscriber;

pub mod build;
pub mod config;
pub mod error;
pub mod file_format;
pub mod filter;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod taxonomy;
pub mod tree;

pub use config::HierarchyOptions;
pub use error::{HierarchyError, Result};
pub use normalize::CanonicalDocument;
pub use pipeline::HierarchyReport;
