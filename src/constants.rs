// globe
pub const GLOBE_RADIUS: f32 = 5.0;
pub const GLOBE_SEGMENTS: u32 = 50;
// flat shading used until (or instead of) the color map
pub const GLOBE_FALLBACK_COLOR: [u8; 4] = [255, 255, 255, 255];

// hotspot markers
pub const MARKER_ALTITUDE: f32 = 5.1;
pub const MARKER_RADIUS: f32 = 0.2;
pub const MARKER_SEGMENTS: u32 = 10;
pub const MARKER_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

// starfield
pub const STAR_COUNT: usize = 10_000;
pub const STAR_SPREAD: f32 = 2000.0;
pub const STAR_SEED: u64 = 0x5EED_57A2;
pub const STAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// camera
pub const CAMERA_DISTANCE: f32 = 12.0;
pub const CAMERA_FOVY: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// interaction
pub const DRAG_SENSITIVITY: f32 = 0.003;
pub const AUTO_ROTATION_STEP: f32 = 0.01;
// fraction of the remaining distance covered each frame,
// ~95% of the way there after one second at 60fps
pub const ROTATION_SMOOTHING: f32 = 0.05;

// assets
#[cfg(not(target_arch = "wasm32"))]
pub const GLOBE_TEXTURE_PATH: &str = "assets/img/globe.jpg";
#[cfg(target_arch = "wasm32")]
pub const GLOBE_TEXTURE_PATH: &str = "/public/img/globe.jpg";
