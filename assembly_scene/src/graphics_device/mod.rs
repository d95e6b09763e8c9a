/// Graphics device module - GPU-facing traits and types

pub mod graphics_device;
pub mod buffer;
pub mod vertex_layout;

pub use graphics_device::*;
pub use buffer::*;
pub use vertex_layout::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
