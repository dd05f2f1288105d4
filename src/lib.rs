#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod resolver;
pub mod util;

pub use crate::core::{PackageId, PackageRecord};
pub use crate::graph::Graph;
pub use crate::resolver::{DependencyResolver, ResolveError};
