//! Landmark model: keypoints describing tracked body parts in a frame.
//!
//! Index constants and connection tables follow the MediaPipe Holistic
//! layout (33 pose points, 21 per hand, 468 face mesh points) so that any
//! annotator adapter speaking that layout plugs in unchanged.

pub mod annotator;

pub use annotator::{LandmarkAnnotator, MockAnnotator, NullAnnotator};

/// A single 3D landmark point (normalized coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// 0-1 normalized, left to right.
    pub x: f32,
    /// 0-1 normalized, top to bottom.
    pub y: f32,
    /// Relative depth.
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Keypoints for one tracked body part.
pub type LandmarkSet = Vec<Landmark>;

/// Landmark sets derived from one frame. Each field is independently
/// optional: absent when that part was not detected in the frame.
#[derive(Debug, Clone, Default)]
pub struct LandmarkSets {
    pub pose: Option<LandmarkSet>,
    pub left_hand: Option<LandmarkSet>,
    pub right_hand: Option<LandmarkSet>,
    pub face: Option<LandmarkSet>,
}

impl LandmarkSets {
    /// True when no part was detected at all.
    pub fn is_empty(&self) -> bool {
        self.pose.is_none()
            && self.left_hand.is_none()
            && self.right_hand.is_none()
            && self.face.is_none()
    }
}

// Pose landmark indices (MediaPipe Pose, 33 total).
pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Number of pose landmarks.
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Number of hand landmarks.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Upper-body pose skeleton (pairs of landmark indices).
pub const POSE_CONNECTIONS: [(usize, usize); 9] = [
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    (LEFT_SHOULDER, LEFT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP),
    (LEFT_HIP, RIGHT_HIP),
    (NOSE, LEFT_SHOULDER),
];

/// Pose landmarks drawn as dots.
pub const POSE_KEY_LANDMARKS: [usize; 9] = [
    NOSE,
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
];

/// Hand skeleton (21-landmark MediaPipe hand).
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    // Thumb
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    // Index finger
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    // Middle finger
    (9, 10),
    (10, 11),
    (11, 12),
    // Ring finger
    (13, 14),
    (14, 15),
    (15, 16),
    // Pinky
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    // Palm
    (5, 9),
    (9, 13),
    (13, 17),
];

/// Face oval contour (MediaPipe face mesh indices, closed ring).
pub const FACE_OVAL: [usize; 36] = [
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
];

/// Outer lip contour (closed ring).
pub const LIPS_OUTER: [usize; 20] = [
    61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 308, 324, 318, 402, 317, 14, 87, 178, 88,
];

/// Left eye contour (closed ring).
pub const LEFT_EYE: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

/// Right eye contour (closed ring).
pub const RIGHT_EYE: [usize; 16] = [
    263, 249, 390, 373, 374, 380, 381, 382, 362, 398, 384, 385, 386, 387, 388, 466,
];

/// All face contour rings drawn by the overlay, in draw order.
pub const FACE_CONTOURS: [&[usize]; 4] = [&FACE_OVAL, &LIPS_OUTER, &LEFT_EYE, &RIGHT_EYE];
