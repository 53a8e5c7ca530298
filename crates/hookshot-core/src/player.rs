//! Host-facing controller aggregate.
//!
//! A host that owns its own loop builds a [`Player`] once with every
//! collaborator handle, calls [`Player::init`], forwards input callbacks as
//! they arrive and calls [`Player::tick`] once per frame.

use glam::Vec2;

use crate::config::ControllerConfig;
use crate::error::Result;
use crate::grapple::{Aim, GrappleController, GrappleEvent};
use crate::locomotion::Locomotion;
use crate::look::LookState;
use crate::services::{CharacterBody, CursorControl, Guide, Probe};

/// First-person controller with constructor-injected collaborators.
pub struct Player<B, P, G, C> {
    config: ControllerConfig,
    body: B,
    probe: P,
    guide: G,
    cursor: C,
    grapple: GrappleController,
    look: LookState,
    locomotion: Locomotion,
    move_input: Vec2,
    look_delta: Vec2,
}

impl<B, P, G, C> Player<B, P, G, C>
where
    B: CharacterBody,
    P: Probe,
    G: Guide,
    C: CursorControl,
{
    /// Validate `config` and take ownership of the collaborators.
    pub fn new(config: ControllerConfig, body: B, probe: P, guide: G, cursor: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grapple: GrappleController::new(config.grapple.clone()),
            config,
            body,
            probe,
            guide,
            cursor,
            look: LookState::default(),
            locomotion: Locomotion::default(),
            move_input: Vec2::ZERO,
            look_delta: Vec2::ZERO,
        })
    }

    /// One-time setup before the first tick.
    pub fn init(&mut self) {
        self.cursor.lock();
        self.guide.set_enabled(false);
        tracing::debug!("Player initialised at {}", self.body.position());
    }

    /// Continuous movement axis (x strafe, y forward), replaced on every call.
    pub fn on_move_input(&mut self, axis: Vec2) {
        self.move_input = axis;
    }

    /// Look delta since the last callback; accumulated until the next tick.
    pub fn on_look_input(&mut self, delta: Vec2) {
        self.look_delta += delta;
    }

    /// Edge-triggered grapple press.
    pub fn on_grapple_pressed(&mut self) -> GrappleEvent {
        let aim = self.aim();
        self.grapple.toggle(aim, &self.probe, &mut self.guide)
    }

    /// Advance one frame: walk, look, then pull.
    ///
    /// Hosts that run these steps as separate systems must keep this order.
    pub fn tick(&mut self, dt: f32) -> Option<GrappleEvent> {
        if !self.grapple.is_active() {
            let displacement = self.locomotion.step(
                &self.config.movement,
                self.move_input,
                self.look.planar_basis(),
                self.body.is_grounded(),
                dt,
            );
            self.body.move_by(displacement);
        }

        let delta = std::mem::take(&mut self.look_delta);
        self.look.apply(&self.config.look, delta);

        let socket_offset = self.config.socket_offset(&self.look);
        self.grapple
            .tick(&mut self.body, socket_offset, &mut self.guide, dt)
    }

    /// Camera position and forward axis.
    pub fn aim(&self) -> Aim {
        self.config.aim(self.body.position(), &self.look)
    }

    /// Hand the cursor back to the windowing layer.
    pub fn release_cursor(&mut self) {
        self.cursor.release();
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn guide(&self) -> &G {
        &self.guide
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    pub fn grapple(&self) -> &GrappleController {
        &self.grapple
    }

    pub fn look(&self) -> &LookState {
        &self.look
    }
}
