//! Cinematic shot script
//!
//! Offsets are multiples of the model radius relative to the model center.

use glam::Vec3;

use super::ease::Ease;
use super::motion::Pose;
use super::ModelBounds;

/// One segment of the cinematic loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub look_from: [f32; 3],
    pub look_to: [f32; 3],
    /// Seconds
    pub duration: f32,
}

/// The fixed shot sequence, played back to back in a loop
pub const SHOTS: [Shot; 8] = [
    // Wide establishing arc
    Shot {
        from: [2.0, 0.4, 1.2],
        to: [0.8, 0.5, 2.2],
        look_from: [0.0, 0.1, 0.0],
        look_to: [0.0, 0.15, 0.0],
        duration: 5.0,
    },
    // Low angle
    Shot {
        from: [0.8, -0.3, 2.0],
        to: [-1.0, -0.2, 1.8],
        look_from: [0.0, 0.3, 0.0],
        look_to: [0.0, 0.4, 0.0],
        duration: 4.0,
    },
    // Close-up at head height
    Shot {
        from: [-0.6, 0.6, 0.9],
        to: [0.5, 0.55, 0.8],
        look_from: [0.0, 0.5, 0.0],
        look_to: [0.0, 0.45, 0.0],
        duration: 4.5,
    },
    // Pull-back reveal
    Shot {
        from: [0.4, 0.3, 0.7],
        to: [2.5, 0.8, 2.0],
        look_from: [0.0, 0.2, 0.0],
        look_to: [0.0, 0.1, 0.0],
        duration: 5.5,
    },
    // High angle sweep
    Shot {
        from: [1.5, 2.0, 1.5],
        to: [-1.2, 1.5, 1.8],
        look_from: [0.0, 0.0, 0.0],
        look_to: [0.0, 0.1, 0.0],
        duration: 4.5,
    },
    // Side dolly
    Shot {
        from: [-2.2, 0.3, 0.0],
        to: [-2.0, 0.4, -1.5],
        look_from: [0.0, 0.2, 0.0],
        look_to: [0.0, 0.25, 0.0],
        duration: 4.0,
    },
    // Behind the shoulder
    Shot {
        from: [-1.5, 0.5, -1.8],
        to: [1.0, 0.3, -1.5],
        look_from: [0.0, 0.3, 0.0],
        look_to: [0.0, 0.2, 0.1],
        duration: 4.5,
    },
    // Rising crane
    Shot {
        from: [1.5, -0.1, 1.5],
        to: [1.8, 1.8, 0.5],
        look_from: [0.0, 0.1, 0.0],
        look_to: [0.0, 0.2, 0.0],
        duration: 5.0,
    },
];

/// Length of one full loop in seconds
pub fn total_duration() -> f32 {
    SHOTS.iter().map(|s| s.duration).sum()
}

/// Position within the loop, always in `[0, total_duration)`
pub fn loop_time(time: f32) -> f32 {
    let total = total_duration();
    let t = time.rem_euclid(total);
    // rem_euclid can round up to `total` for tiny negative inputs
    if t >= total || !t.is_finite() {
        0.0
    } else {
        t
    }
}

/// Index of the shot playing at `loop_time` and the local progress in `[0, 1]`
pub fn shot_at(loop_time: f32) -> (usize, f32) {
    let mut start = 0.0;
    for (index, shot) in SHOTS.iter().enumerate() {
        if loop_time < start + shot.duration {
            return (index, ((loop_time - start) / shot.duration).clamp(0.0, 1.0));
        }
        start += shot.duration;
    }
    (SHOTS.len() - 1, 1.0)
}

fn lerp_offset(a: [f32; 3], b: [f32; 3], t: f32) -> Vec3 {
    Vec3::from_array(a).lerp(Vec3::from_array(b), t)
}

/// Camera pose at `time` for the given model
pub fn sample(time: f32, bounds: &ModelBounds) -> Pose {
    let (index, shot_t) = shot_at(loop_time(time));
    let shot = &SHOTS[index];
    let eased = Ease::InOutCubic.apply(shot_t);

    Pose {
        position: bounds.center + lerp_offset(shot.from, shot.to, eased) * bounds.radius,
        target: bounds.center + lerp_offset(shot.look_from, shot.look_to, eased) * bounds.radius,
    }
}
