//! Visualization support for archspace views
//!
//! This crate provides the render side of a view session:
//! - A headless scene table implementing the core `Renderer` trait
//! - An orbiting perspective camera
//! - Ray picking against point spheres
//! - A frame loop consuming published scene frames

pub mod viewer;
pub mod renderer;
pub mod camera;
pub mod picking;

pub use viewer::*;
pub use renderer::*;
pub use camera::*;
pub use picking::*;

use archspace_core::{Catalogue, Result, ViewConfig, ViewSession};

/// Start a session drawing into a fresh scene table sized `width` x `height`
pub fn headless_session(
    catalogue: Catalogue,
    config: ViewConfig,
    width: u32,
    height: u32,
) -> Result<ViewSession<SceneTable>> {
    let table = SceneTable::new(&config.camera, Viewport::new(width, height));
    ViewSession::new(catalogue, config, table)
}
