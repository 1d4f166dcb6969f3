pub mod camera;
pub mod geospatial;
pub mod hotspots;
pub mod interaction;
pub mod material;
pub mod mesh;
pub mod notification;
pub mod picking;
pub mod render_pipelines;
pub mod rotation;
pub mod texture;
