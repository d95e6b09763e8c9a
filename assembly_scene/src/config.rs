//! Scene configuration

use crate::scene::RenderLayers;

/// Scene-wide settings used when building instances and classifying
/// assemblies
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Color given to instances whose node has no explicit color
    pub default_color: [f32; 4],

    /// Highlight color for hovered instances
    pub hovered_color: [f32; 4],

    /// Highlight color for selected instances
    pub selected_color: [f32; 4],

    /// Layers stamped on newly built instances
    pub default_layers: RenderLayers,

    /// Log the empty-assembly list after classification
    pub log_empty_assemblies: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            default_color: [0.8, 0.8, 0.8, 1.0],
            hovered_color: [1.0, 0.85, 0.2, 1.0],
            selected_color: [0.2, 0.6, 1.0, 1.0],
            default_layers: RenderLayers::GEOMETRY,
            log_empty_assemblies: false,
        }
    }
}
