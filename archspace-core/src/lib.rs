//! Core data structures and view-state engine for archspace
//!
//! This crate holds the architecture-style catalogue and everything that turns
//! it into a renderable scene: the dimension mapping engine, visibility
//! filters, the view projector, hover/selection handling and cluster
//! summaries. Rendering itself happens behind the [`Renderer`] trait.

pub mod point;
pub mod keys;
pub mod error;
pub mod dataset;
pub mod builtin;
pub mod mapping;
pub mod filter;
pub mod projector;
pub mod selection;
pub mod cluster;
pub mod describe;
pub mod config;
pub mod renderer;
pub mod frame;
pub mod session;

pub use point::*;
pub use keys::*;
pub use error::*;
pub use dataset::*;
pub use mapping::*;
pub use filter::*;
pub use projector::*;
pub use selection::*;
pub use cluster::*;
pub use describe::*;
pub use config::*;
pub use renderer::*;
pub use frame::*;
pub use session::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};
