pub mod camera;
pub mod globe;
pub mod marker;
pub mod material;
pub mod mesh;
pub mod render_pipelines;
