//! Default configuration constants for wesign.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Default capture frame width in pixels.
///
/// 640×480 matches the resolution the classification service was trained
/// against; the overlay surface uses the same geometry.
pub const FRAME_WIDTH: u32 = 640;

/// Default capture frame height in pixels.
pub const FRAME_HEIGHT: u32 = 480;

/// Default capture frame rate in frames per second.
pub const FRAME_RATE: u32 = 30;

/// Default dispatch period in milliseconds.
///
/// The inference dispatcher samples the draw surface on its own timer,
/// independent of the capture rate. 100ms keeps the service fed without
/// flooding it; ticks that land while a request is in flight are dropped.
pub const DISPATCH_INTERVAL_MS: u64 = 100;

/// Default base URL of the classification service.
pub const SERVICE_URL: &str = "http://127.0.0.1:5000";

/// Prediction endpoint path on the classification service.
pub const PREDICT_ENDPOINT: &str = "/predict";

/// Reset endpoint path on the classification service.
pub const RESET_ENDPOINT: &str = "/reset";

/// JPEG quality (1-100) for frames exported to the classification service.
pub const JPEG_QUALITY: u8 = 80;

/// Default speech recognition language tag.
///
/// Recognition targets Filipino (Tagalog) speech.
pub const VOICE_LANGUAGE: &str = "fil-PH";

// Sentinel prediction labels. These are fixed placeholder values denoting
// known non-nominal states; presentation layers match on them verbatim.

/// Label shown before the first frame has been processed.
pub const LABEL_INITIALIZING: &str = "Initializing...";

/// Label shown while the service is still accumulating frames.
pub const LABEL_COLLECTING: &str = "Collecting frames...";

/// Label set by the reset command.
pub const LABEL_READY: &str = "Ready for new sign...";

/// Label set when the classification request cannot reach the service.
pub const LABEL_CONNECTION_ERROR: &str = "Connection Error";

/// Label set when the service responds with an explicit error payload.
pub const LABEL_MODEL_ERROR: &str = "Model Error";

/// Label set when the reset request itself fails.
pub const LABEL_RESET_FAILED: &str = "Reset failed";

/// Label of the single sentinel result emitted when an utterance matches
/// no dictionary entry.
pub const NO_MATCH_LABEL: &str = "No matching sign found";

// Overlay palette, RGB: green/yellow pose, red/pink left hand,
// blue/light-blue right hand, white face mesh.

pub const POSE_CONNECTOR_COLOR: [u8; 3] = [0x00, 0xFF, 0x00];
pub const POSE_JOINT_COLOR: [u8; 3] = [0xFF, 0xCC, 0x00];
pub const LEFT_HAND_CONNECTOR_COLOR: [u8; 3] = [0xFF, 0x00, 0x00];
pub const LEFT_HAND_JOINT_COLOR: [u8; 3] = [0xFF, 0xAA, 0xAA];
pub const RIGHT_HAND_CONNECTOR_COLOR: [u8; 3] = [0x00, 0x00, 0xFF];
pub const RIGHT_HAND_JOINT_COLOR: [u8; 3] = [0xAA, 0xAF, 0xFF];
pub const FACE_MESH_COLOR: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Stroke width in pixels for pose and hand connectors.
pub const SKELETON_STROKE: u32 = 2;

/// Dot radius in pixels for pose joints.
pub const POSE_JOINT_RADIUS: u32 = 3;

/// Dot radius in pixels for hand joints.
pub const HAND_JOINT_RADIUS: u32 = 4;

/// Blend factor for the face mesh stroke.
///
/// The mesh is drawn last with a reduced stroke weight so it never
/// visually dominates the hand or pose overlays. Downstream consumers
/// (confidence coloring, screenshots) rely on hands staying visible.
pub const FACE_MESH_ALPHA: f32 = 0.3;
