//! Chart scene: layout, primitives, and the SVG and GPU backends.

pub mod geometry;
pub mod layout;
pub mod mesh;
pub mod scene;
pub mod svg;
pub mod text;

pub use geometry::SceneGeometry;
pub use layout::{Bounds, Viewport, SCENE_HEIGHT, SCENE_WIDTH};
pub use mesh::{clear_color, tessellate, ChartMesh, Vertex};
pub use scene::{build_scene, HitTarget, Scene, Shape, TextAnchor};
pub use svg::{to_svg, write_svg};
pub use text::{text_runs, TextRun};
