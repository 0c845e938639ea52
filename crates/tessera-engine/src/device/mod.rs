//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a surface
//! - owning an offscreen color target that frames render into
//! - tracking device loss for the render buffers

mod gpu;
mod init;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
