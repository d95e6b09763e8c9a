/*!
# Assembly Scene

Scene model for a CAD-style assembly viewer.

This crate keeps the structural hierarchy of a loaded model (assembly nodes
owning geometry primitives), aggregates spatial bounds bottom-up through
that hierarchy, and draws GPU buffer geometries through a small trait-based
device abstraction. The rendering context itself is created by the host
application and exposed through the `GraphicsDevice` trait.

## Architecture

- **AssemblyModel**: id-keyed node and primitive arenas with hierarchy edits
- **SceneAggregator**: bottom-up bound aggregation and empty-assembly classification
- **GeometryInstance**: fixed-size per-instance GPU record
- **ArraysGeometry / ElementsGeometry**: vertex, index and instance buffers
- **DrawStrategy**: bind, draw and ranged draw over a buffer geometry
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod scene;

// Main scene3d namespace module
pub mod scene3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::SceneConfig;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // GPU device sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
