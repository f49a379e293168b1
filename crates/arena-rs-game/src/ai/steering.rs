//! Planar steering math for a flat arena (direct movement, no obstacles).

/// Distance between two positions in the XZ plane.
pub fn distance_xz(x1: f32, z1: f32, x2: f32, z2: f32) -> f32 {
    let dx = x2 - x1;
    let dz = z2 - z1;
    (dx * dx + dz * dz).sqrt()
}

/// Compute the kinematic step toward a goal position on the XZ plane.
///
/// Returns `None` when the goal is within `stopping_distance`; otherwise
/// `(dx, dz)` — the position delta for one step of `dt` seconds at `speed`
/// meters per second.
pub fn step_toward(
    current_x: f32,
    current_z: f32,
    goal_x: f32,
    goal_z: f32,
    speed: f32,
    stopping_distance: f32,
    dt: f32,
) -> Option<(f32, f32)> {
    let dx = goal_x - current_x;
    let dz = goal_z - current_z;
    let dist = (dx * dx + dz * dz).sqrt();

    if dist <= stopping_distance {
        return None;
    }

    let norm_x = dx / dist;
    let norm_z = dz / dist;
    Some((norm_x * speed * dt, norm_z * speed * dt))
}

/// Compute the yaw angle (0..360 degrees) from one position facing another.
///
/// Convention: 0 = +Z, 90 = -X, 180 = -Z, 270 = +X.
pub fn yaw_toward(from_x: f32, from_z: f32, to_x: f32, to_z: f32) -> f32 {
    let dx = to_x - from_x;
    let dz = to_z - from_z;
    let yaw = (-dx).atan2(dz).to_degrees();
    ((yaw % 360.0) + 360.0) % 360.0
}

/// Interpolate `current` yaw toward `target` along the shortest arc by
/// factor `t` (clamped to 0..1). Result is normalized to 0..360.
pub fn slerp_yaw(current: f32, target: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let mut delta = (target - current) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    (((current + delta * t) % 360.0) + 360.0) % 360.0
}
