//! Everything the GPU backend draws for one scene: triangles and text runs.

use super::mesh::{tessellate, ChartMesh};
use super::scene::Scene;
use super::text::{text_runs, TextRun};

#[derive(Debug, Clone, Default)]
pub struct SceneGeometry {
    pub mesh: ChartMesh,
    pub text: Vec<TextRun>,
}

impl SceneGeometry {
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            mesh: tessellate(scene),
            text: text_runs(scene),
        }
    }
}
