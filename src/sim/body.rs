//! Box physics: semi-implicit Euler integration and wall reflection
//!
//! A body is one axis-aligned rectangle. Position is its top-left corner; the
//! rectangle occupies `[pos.x, pos.x + width) x [pos.y, pos.y + height)`.
//! Bodies do not collide with each other, only with the field walls.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// How a same-tick hit on both the x- and y-walls resolves.
///
/// The two wall checks write the reflection mask independently, so a corner
/// hit makes them compete. Under the default the y check wins outright and
/// only the y velocity component flips that tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReflectPolicy {
    /// On a corner hit, only the y component reflects.
    #[default]
    YOverridesX,
    /// On a corner hit, both components reflect.
    Combined,
}

/// A simulated rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    /// Top-left corner
    pub pos: IVec2,
    pub vel: IVec2,
    pub acc: IVec2,
    pub width: i32,
    pub height: i32,
}

impl Body {
    /// Create a body at `(x, y)` with zero velocity and acceleration.
    ///
    /// `width` and `height` must be positive; this is not validated here,
    /// the field checks it at registration.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            vel: IVec2::ZERO,
            acc: IVec2::ZERO,
            width,
            height,
        }
    }

    pub fn set_vel(&mut self, vel: IVec2) {
        self.vel = vel;
    }

    pub fn set_acc(&mut self, acc: IVec2) {
        self.acc = acc;
    }

    /// Advance one tick inside a `field_width x field_height` bound.
    ///
    /// Order matters and is load-bearing for determinism:
    /// 1. `vel += acc` (semi-implicit Euler)
    /// 2. `pos += vel`
    /// 3. build the reflection mask from the *new* position
    /// 4. `vel *= mask`
    ///
    /// The wall test is strict `>` on the far edge and `<=` on the near edge:
    /// a right edge landing exactly on `field_width` does not reflect, a
    /// position reaching exactly 0 does.
    pub fn update(&mut self, field_width: i32, field_height: i32, policy: ReflectPolicy) {
        self.vel += self.acc;
        self.pos += self.vel;

        let mut mask = IVec2::ONE;
        if self.pos.x + self.width > field_width || self.pos.x <= 0 {
            mask = IVec2::new(-1, 1);
        }
        if self.pos.y + self.height > field_height || self.pos.y <= 0 {
            mask = match policy {
                ReflectPolicy::YOverridesX => IVec2::new(1, -1),
                ReflectPolicy::Combined => IVec2::new(mask.x, -1),
            };
        }
        self.vel *= mask;
    }
}
