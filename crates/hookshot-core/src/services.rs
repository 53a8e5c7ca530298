//! Host engine collaborators.
//!
//! The controller never looks anything up on its own; the host hands it these
//! handles, either once at construction ([`crate::Player::new`]) or per call.

use glam::Vec3;

use crate::config::SurfaceMask;

/// Directional ray query against the physics world.
pub trait Probe {
    /// Cast from `origin` along the unit vector `direction`, returning the
    /// world-space hit point of the first surface in `surfaces` within
    /// `max_distance`.
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        surfaces: SurfaceMask,
    ) -> Option<Vec3>;
}

/// The player's collision body.
pub trait CharacterBody {
    /// Current world-space position of the body origin.
    fn position(&self) -> Vec3;

    /// Place the body at `position` without resolving collisions.
    fn teleport(&mut self, position: Vec3);

    /// Move by `displacement`, resolving collisions along the way.
    fn move_by(&mut self, displacement: Vec3);

    /// Whether the last [`move_by`](Self::move_by) ended on the ground.
    fn is_grounded(&self) -> bool;
}

/// The rope line drawn between the hook socket and the anchor.
pub trait Guide {
    fn set_enabled(&mut self, enabled: bool);

    /// Socket end, follows the player.
    fn set_start(&mut self, point: Vec3);

    /// Anchor end, pinned on attach.
    fn set_end(&mut self, point: Vec3);
}

/// Cursor lock and visibility, owned by the windowing layer.
pub trait CursorControl {
    /// Lock the cursor to the window and hide it.
    fn lock(&mut self);

    /// Free and show the cursor.
    fn release(&mut self);
}
