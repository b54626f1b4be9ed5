use glam::{IVec2, Vec2};

/// Sign-only step direction of a single component: 1, -1 or 0.
///
/// Unlike `f32::signum`, zero maps to 0 so a ray parallel to an axis never
/// steps along it. NaN also maps to 0.
pub fn classify(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Classify both components of a vector independently
pub fn classify_vector(vector: Vec2) -> IVec2 {
    IVec2::new(classify(vector.x), classify(vector.y))
}
