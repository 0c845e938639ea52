//! Tessera engine crate.
//!
//! This crate owns the GPU side of shape rendering: device bootstrap, the
//! per-shape buffer cache and its wgpu backend. Geometry comes from
//! `tessera-shapes`, re-exported here as [`shapes`].

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;

pub use tessera_shapes as shapes;
