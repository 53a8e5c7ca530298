//! Grapple attach, pull and release.
//!
//! The grapple has two states: idle, or attached to a world-space anchor. A
//! press while idle probes along the camera's forward axis; a press while
//! attached lets go. While attached, every tick pulls the body toward the
//! anchor at a roughly constant absolute speed and releases once the body is
//! within [`GrappleConfig::release_distance`] of it.

use glam::Vec3;

use crate::config::GrappleConfig;
use crate::services::{CharacterBody, Guide, Probe};

/// Where the grapple is fired from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aim {
    /// Camera position.
    pub origin: Vec3,
    /// Camera forward axis (unit length).
    pub direction: Vec3,
}

/// Whether the player is hooked, and to where.
///
/// The anchor only exists while attached, so a stale anchor can never be read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GrappleState {
    anchor: Option<Vec3>,
}

impl GrappleState {
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    /// The anchor point, if attached.
    pub fn anchor(&self) -> Option<Vec3> {
        self.anchor
    }
}

/// Why a grapple let go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The grapple input was pressed again.
    Toggled,
    /// The body came within release distance of the anchor.
    Reached,
}

/// Outcome of a grapple input or tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrappleEvent {
    /// The probe hit a surface and the grapple attached there.
    Attached {
        anchor: Vec3,
        /// Distance from the aim origin to the anchor.
        distance: f32,
    },
    /// The probe found nothing in range.
    Missed,
    /// The grapple let go.
    Released(ReleaseReason),
}

/// Owns the [`GrappleState`] and mediates the attach/pull/release cycle.
#[derive(Clone, Debug, Default)]
pub struct GrappleController {
    config: GrappleConfig,
    state: GrappleState,
}

impl GrappleController {
    pub fn new(config: GrappleConfig) -> Self {
        Self {
            config,
            state: GrappleState::default(),
        }
    }

    pub fn state(&self) -> GrappleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Handle one press of the grapple input.
    ///
    /// Detaches if attached; otherwise probes along `aim` and attaches to the
    /// hit point. A miss leaves everything untouched.
    pub fn toggle(
        &mut self,
        aim: Aim,
        probe: &impl Probe,
        guide: &mut impl Guide,
    ) -> GrappleEvent {
        if self.state.is_active() {
            self.release(guide, ReleaseReason::Toggled);
            return GrappleEvent::Released(ReleaseReason::Toggled);
        }

        let Some(anchor) = probe.cast(
            aim.origin,
            aim.direction,
            self.config.max_distance,
            self.config.surfaces,
        ) else {
            tracing::debug!("Grapple missed (range {:.1})", self.config.max_distance);
            return GrappleEvent::Missed;
        };

        self.state.anchor = Some(anchor);
        guide.set_enabled(true);
        guide.set_end(anchor);

        let distance = aim.origin.distance(anchor);
        tracing::debug!("Grapple attached at {anchor} ({distance:.1} away)");
        GrappleEvent::Attached { anchor, distance }
    }

    /// Advance the pull by one frame.
    ///
    /// `socket_offset` is the world-space offset from the body origin to the
    /// hook socket; the rope's start follows it. Returns
    /// `Some(GrappleEvent::Released(ReleaseReason::Reached))` on the tick that
    /// arrives.
    pub fn tick(
        &mut self,
        body: &mut impl CharacterBody,
        socket_offset: Vec3,
        guide: &mut impl Guide,
        dt: f32,
    ) -> Option<GrappleEvent> {
        let anchor = self.state.anchor?;

        let position = body.position();
        let remaining = position.distance(anchor);
        let next = if remaining > f32::EPSILON {
            position.lerp(anchor, pull_factor(self.config.pull_speed, dt, remaining))
        } else {
            anchor
        };
        body.teleport(next);
        guide.set_start(next + socket_offset);

        if next.distance(anchor) < self.config.release_distance {
            self.release(guide, ReleaseReason::Reached);
            return Some(GrappleEvent::Released(ReleaseReason::Reached));
        }
        None
    }

    fn release(&mut self, guide: &mut impl Guide, reason: ReleaseReason) {
        self.state.anchor = None;
        guide.set_enabled(false);
        tracing::debug!("Grapple released: {reason:?}");
    }
}

/// Interpolation factor that moves `pull_speed * dt` units along a segment of
/// length `remaining`.
///
/// Clamped to `[0, 1]` so a step never overshoots the anchor. Diverges as
/// `remaining` approaches zero, which is what the release distance guards.
pub fn pull_factor(pull_speed: f32, dt: f32, remaining: f32) -> f32 {
    let t = pull_speed * dt / remaining;
    if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    /// Probe that hits a fixed point, or nothing.
    struct FixedProbe(Option<Vec3>);

    impl Probe for FixedProbe {
        fn cast(&self, _: Vec3, _: Vec3, _: f32, _: crate::SurfaceMask) -> Option<Vec3> {
            self.0
        }
    }

    /// Probe that hits a single point only if it lies within range.
    struct PointProbe(Vec3);

    impl Probe for PointProbe {
        fn cast(
            &self,
            origin: Vec3,
            _: Vec3,
            max_distance: f32,
            _: crate::SurfaceMask,
        ) -> Option<Vec3> {
            (origin.distance(self.0) <= max_distance).then_some(self.0)
        }
    }

    #[derive(Default)]
    struct TestBody {
        position: Vec3,
    }

    impl CharacterBody for TestBody {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn teleport(&mut self, position: Vec3) {
            self.position = position;
        }

        fn move_by(&mut self, displacement: Vec3) {
            self.position += displacement;
        }

        fn is_grounded(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct TestGuide {
        enabled: bool,
        start: Option<Vec3>,
        end: Option<Vec3>,
    }

    impl Guide for TestGuide {
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn set_start(&mut self, point: Vec3) {
            self.start = Some(point);
        }

        fn set_end(&mut self, point: Vec3) {
            self.end = Some(point);
        }
    }

    fn aim_forward() -> Aim {
        Aim {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }

    fn controller(pull_speed: f32) -> GrappleController {
        GrappleController::new(GrappleConfig {
            pull_speed,
            ..Default::default()
        })
    }

    fn attached_at(anchor: Vec3, pull_speed: f32) -> (GrappleController, TestGuide) {
        let mut grapple = controller(pull_speed);
        let mut guide = TestGuide::default();
        grapple.toggle(aim_forward(), &FixedProbe(Some(anchor)), &mut guide);
        assert!(grapple.is_active());
        (grapple, guide)
    }

    #[test]
    fn test_miss_leaves_state_unchanged() {
        let mut grapple = controller(5.0);
        let mut guide = TestGuide::default();

        let event = grapple.toggle(aim_forward(), &FixedProbe(None), &mut guide);

        assert_eq!(event, GrappleEvent::Missed);
        assert!(!grapple.is_active());
        assert_eq!(grapple.state().anchor(), None);
        assert!(!guide.enabled);
        assert_eq!(guide.end, None);
    }

    #[test]
    fn test_attach_records_exact_hit_point() {
        let hit = Vec3::new(1.25, 7.5, -13.0);
        let mut grapple = controller(5.0);
        let mut guide = TestGuide::default();

        let event = grapple.toggle(aim_forward(), &FixedProbe(Some(hit)), &mut guide);

        assert!(matches!(event, GrappleEvent::Attached { anchor, .. } if anchor == hit));
        assert!(grapple.is_active());
        assert_eq!(grapple.state().anchor(), Some(hit));
        assert!(guide.enabled);
        assert_eq!(guide.end, Some(hit));
    }

    #[test]
    fn test_out_of_range_anchor_misses() {
        let mut grapple = GrappleController::new(GrappleConfig {
            max_distance: 10.0,
            ..Default::default()
        });
        let mut guide = TestGuide::default();
        let probe = PointProbe(Vec3::new(0.0, 0.0, -30.0));

        assert_eq!(
            grapple.toggle(aim_forward(), &probe, &mut guide),
            GrappleEvent::Missed
        );
        assert!(!grapple.is_active());
    }

    #[test]
    fn test_toggle_twice_detaches() {
        let (mut grapple, mut guide) = attached_at(Vec3::new(0.0, 0.0, 10.0), 5.0);
        let mut body = TestBody::default();
        grapple.tick(&mut body, Vec3::ZERO, &mut guide, 0.5);
        assert!(grapple.is_active());

        // The second press never probes, so even a probe that would hit is ignored.
        let event = grapple.toggle(
            aim_forward(),
            &FixedProbe(Some(Vec3::splat(3.0))),
            &mut guide,
        );

        assert_eq!(event, GrappleEvent::Released(ReleaseReason::Toggled));
        assert!(!grapple.is_active());
        assert_eq!(grapple.state().anchor(), None);
        assert!(!guide.enabled);
    }

    #[test]
    fn test_pull_step_moves_at_pull_speed() {
        let (mut grapple, mut guide) = attached_at(Vec3::new(0.0, 0.0, 10.0), 5.0);
        let mut body = TestBody::default();

        assert!((pull_factor(5.0, 0.1, 10.0) - 0.05).abs() < EPSILON);

        let event = grapple.tick(&mut body, Vec3::ZERO, &mut guide, 0.1);

        assert_eq!(event, None);
        assert!(body.position.distance(Vec3::new(0.0, 0.0, 0.5)) < EPSILON);
        assert!(grapple.is_active());
    }

    #[test]
    fn test_rope_start_follows_socket() {
        let (mut grapple, mut guide) = attached_at(Vec3::new(0.0, 0.0, 10.0), 5.0);
        let mut body = TestBody::default();
        let socket = Vec3::new(0.3, 1.0, 0.0);

        grapple.tick(&mut body, socket, &mut guide, 0.1);

        let start = guide.start.unwrap();
        assert!(start.distance(body.position + socket) < EPSILON);
        assert_eq!(guide.end, Some(Vec3::new(0.0, 0.0, 10.0)));
    }

    #[test]
    fn test_auto_release_within_threshold() {
        let anchor = Vec3::new(0.0, 0.0, 10.0);
        let (mut grapple, mut guide) = attached_at(anchor, 5.0);
        let mut body = TestBody {
            position: Vec3::new(0.0, 0.0, 9.1),
        };

        let event = grapple.tick(&mut body, Vec3::ZERO, &mut guide, 0.016);

        assert_eq!(event, Some(GrappleEvent::Released(ReleaseReason::Reached)));
        assert!(!grapple.is_active());
        assert!(!guide.enabled);
    }

    #[test]
    fn test_zero_distance_releases_without_nan() {
        let anchor = Vec3::new(2.0, 3.0, 4.0);
        let (mut grapple, mut guide) = attached_at(anchor, 5.0);
        let mut body = TestBody { position: anchor };

        let event = grapple.tick(&mut body, Vec3::ZERO, &mut guide, 0.016);

        assert_eq!(event, Some(GrappleEvent::Released(ReleaseReason::Reached)));
        assert_eq!(body.position, anchor);
        assert!(body.position.is_finite());
    }

    #[test]
    fn test_large_step_does_not_overshoot() {
        let anchor = Vec3::new(0.0, 0.0, 10.0);
        let (mut grapple, mut guide) = attached_at(anchor, 100.0);
        let mut body = TestBody::default();

        grapple.tick(&mut body, Vec3::ZERO, &mut guide, 1.0);

        assert_eq!(body.position, anchor);
        assert!(!grapple.is_active());
    }

    #[test]
    fn test_pull_converges_and_releases() {
        let anchor = Vec3::new(0.0, 20.0, -30.0);
        let (mut grapple, mut guide) = attached_at(anchor, 10.0);
        let mut body = TestBody::default();
        let dt = 1.0 / 60.0;

        let mut ticks = 0;
        while grapple.is_active() {
            let before = body.position.distance(anchor);
            grapple.tick(&mut body, Vec3::ZERO, &mut guide, dt);
            assert!(body.position.distance(anchor) < before);
            ticks += 1;
            assert!(ticks < 10_000, "pull never released");
        }

        assert!(body.position.distance(anchor) < 1.0);
        // ~35 units at 10 u/s.
        assert!((200..=220).contains(&ticks), "took {ticks} ticks");
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut grapple = controller(5.0);
        let mut guide = TestGuide::default();
        let mut body = TestBody {
            position: Vec3::ONE,
        };

        assert_eq!(grapple.tick(&mut body, Vec3::ZERO, &mut guide, 0.1), None);
        assert_eq!(body.position, Vec3::ONE);
        assert_eq!(guide.start, None);
    }
}
