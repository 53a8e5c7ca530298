//! Headless grapple simulator.
//!
//! Drives the controller against an analytic world (a floor with a hookable
//! ceiling above it) without a window or physics engine, and measures how the
//! pull behaves for a given set of tunables.
//!
//! Telemetry rows go to stdout as CSV; the summary goes to stderr.
//!
//! Run with: cargo run -p hookshot --bin grapple-sim -- --ceiling 30 --pitch 60

#[cfg(target_family = "wasm")]
fn main() {
    eprintln!("ERROR: grapple-sim is only available on native targets");
}

#[cfg(not(target_family = "wasm"))]
mod sim {
    use std::process::ExitCode;

    use clap::Parser;
    use glam::{Vec2, Vec3};
    use hookshot_core::{
        CharacterBody, ControllerConfig, CursorControl, GrappleEvent, Guide, HorizontalBlend,
        Player, Probe, SurfaceMask,
    };

    /// Layer index of the floor.
    const FLOOR_LAYER: u32 = 0;

    /// Layer index of the ceiling.
    const CEILING_LAYER: u32 = 1;

    /// Height of the body's center above its feet.
    const BODY_HALF_HEIGHT: f32 = 0.9;

    /// Give up after this much simulated time.
    const MAX_SIMULATION_TIME: f32 = 30.0;

    #[derive(Parser)]
    #[command(about = "Headless grapple pull simulator")]
    struct Args {
        /// Height of the hookable ceiling in meters.
        #[arg(long, default_value_t = 30.0)]
        ceiling: f32,

        /// Pitch to aim at before firing, in degrees.
        #[arg(long, default_value_t = 60.0)]
        pitch: f32,

        /// Seconds to walk forward before firing.
        #[arg(long, default_value_t = 0.5)]
        walk: f32,

        /// Grapple pull speed in meters per second.
        #[arg(long, default_value_t = 25.0)]
        pull_speed: f32,

        /// Maximum grapple range in meters.
        #[arg(long, default_value_t = 50.0)]
        max_distance: f32,

        /// Gravity multiplier.
        #[arg(long, default_value_t = 1.0)]
        weight: f32,

        /// Timestep in seconds.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Sum strafe and forward input instead of letting forward win.
        #[arg(long)]
        combined_strafe: bool,

        /// Print a telemetry row every N ticks.
        #[arg(long, default_value_t = 1)]
        every: u32,
    }

    /// Horizontal plane at `height` on `layer`.
    #[derive(Clone, Copy, Debug)]
    struct Plane {
        height: f32,
        layer: u32,
    }

    /// Ray caster over a stack of infinite horizontal planes.
    struct PlaneProbe {
        planes: Vec<Plane>,
    }

    impl Probe for PlaneProbe {
        fn cast(
            &self,
            origin: Vec3,
            direction: Vec3,
            max_distance: f32,
            surfaces: SurfaceMask,
        ) -> Option<Vec3> {
            if direction.y.abs() <= f32::EPSILON {
                return None;
            }

            self.planes
                .iter()
                .filter(|plane| surfaces.intersects(SurfaceMask::layer(plane.layer)))
                .map(|plane| (plane.height - origin.y) / direction.y)
                .filter(|t| (0.0..=max_distance).contains(t))
                .min_by(f32::total_cmp)
                .map(|t| origin + direction * t)
        }
    }

    /// Point body that stands on the floor and stops at the ceiling.
    struct PlaneBody {
        position: Vec3,
        ceiling: f32,
        grounded: bool,
    }

    impl CharacterBody for PlaneBody {
        fn position(&self) -> Vec3 {
            self.position
        }

        fn teleport(&mut self, position: Vec3) {
            self.position = position;
        }

        fn move_by(&mut self, displacement: Vec3) {
            let target = self.position + displacement;
            let floor = BODY_HALF_HEIGHT;
            let roof = self.ceiling - BODY_HALF_HEIGHT;
            self.grounded = target.y <= floor;
            self.position = target.with_y(target.y.clamp(floor, roof.max(floor)));
        }

        fn is_grounded(&self) -> bool {
            self.grounded
        }
    }

    #[derive(Default)]
    struct Rope {
        enabled: bool,
        start: Vec3,
        end: Vec3,
    }

    impl Rope {
        fn length(&self) -> f32 {
            if self.enabled {
                self.start.distance(self.end)
            } else {
                0.0
            }
        }
    }

    impl Guide for Rope {
        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn set_start(&mut self, point: Vec3) {
            self.start = point;
        }

        fn set_end(&mut self, point: Vec3) {
            self.end = point;
        }
    }

    #[derive(Default)]
    struct HeadlessCursor {
        locked: bool,
    }

    impl CursorControl for HeadlessCursor {
        fn lock(&mut self) {
            self.locked = true;
        }

        fn release(&mut self) {
            self.locked = false;
        }
    }

    type SimPlayer = Player<PlaneBody, PlaneProbe, Rope, HeadlessCursor>;

    fn build_config(args: &Args) -> ControllerConfig {
        let mut config = ControllerConfig::default();
        config.grapple.pull_speed = args.pull_speed;
        config.grapple.max_distance = args.max_distance;
        config.grapple.surfaces = SurfaceMask::layer(CEILING_LAYER);
        config.movement.weight = args.weight;
        if args.combined_strafe {
            config.movement.horizontal_blend = HorizontalBlend::Combined;
        }
        config
    }

    /// Fixed-step driver that emits a telemetry row every `every` ticks.
    struct Clock {
        time: f32,
        ticks: u32,
        dt: f32,
        every: u32,
    }

    impl Clock {
        fn step(&mut self, player: &mut SimPlayer, phase: &str) -> Option<GrappleEvent> {
            let event = player.tick(self.dt);
            self.time += self.dt;
            if self.ticks % self.every == 0 {
                emit_row(self.time, phase, player);
            }
            self.ticks += 1;
            event
        }
    }

    fn emit_row(time: f32, phase: &str, player: &SimPlayer) {
        let position = player.body().position();
        let anchor_distance = player
            .grapple()
            .state()
            .anchor()
            .map_or(0.0, |anchor| position.distance(anchor));
        println!(
            "{time:.4},{phase},{:.4},{:.4},{:.4},{anchor_distance:.4},{:.4},{}",
            position.x,
            position.y,
            position.z,
            player.guide().length(),
            player.body().is_grounded(),
        );
    }

    pub fn run() -> ExitCode {
        let args = Args::parse();
        if !(args.dt > 0.0 && args.dt.is_finite()) {
            eprintln!("# ERROR: --dt must be a positive number");
            return ExitCode::FAILURE;
        }

        let config = build_config(&args);
        let sensitivity = config.look.sensitivity;
        let body = PlaneBody {
            position: Vec3::new(0.0, BODY_HALF_HEIGHT, 0.0),
            ceiling: args.ceiling,
            grounded: true,
        };
        let probe = PlaneProbe {
            planes: vec![
                Plane {
                    height: 0.0,
                    layer: FLOOR_LAYER,
                },
                Plane {
                    height: args.ceiling,
                    layer: CEILING_LAYER,
                },
            ],
        };

        let mut player = match Player::new(
            config,
            body,
            probe,
            Rope::default(),
            HeadlessCursor::default(),
        ) {
            Ok(player) => player,
            Err(e) => {
                eprintln!("# ERROR: invalid configuration: {e}");
                return ExitCode::FAILURE;
            }
        };
        player.init();

        println!("time,phase,x,y,z,anchor_distance,rope_length,grounded");

        let mut clock = Clock {
            time: 0.0,
            ticks: 0,
            dt: args.dt,
            every: args.every.max(1),
        };

        // Aim first; look input is consumed on the next tick.
        player.on_look_input(Vec2::new(0.0, args.pitch / sensitivity));
        player.on_move_input(Vec2::Y);
        let walk_until = args.walk;
        loop {
            clock.step(&mut player, "walk");
            if clock.time >= walk_until {
                break;
            }
        }
        player.on_move_input(Vec2::ZERO);

        let fired_from = player.body().position();
        let (anchor, range) = match player.on_grapple_pressed() {
            GrappleEvent::Attached { anchor, distance } => (anchor, distance),
            event => {
                eprintln!(
                    "# Grapple did not attach ({event:?}) - pitch {:.1} deg, range {:.1} m",
                    player.look().pitch(),
                    player.config().grapple.max_distance,
                );
                return ExitCode::FAILURE;
            }
        };
        tracing::info!("Hooked {anchor} at {range:.2}m");

        let pull_started = clock.time;
        let mut pull_time = None;
        while clock.time - pull_started < MAX_SIMULATION_TIME {
            if let Some(GrappleEvent::Released(reason)) = clock.step(&mut player, "pull") {
                tracing::debug!("Released: {reason:?}");
                pull_time = Some(clock.time - pull_started);
                break;
            }
        }
        let released_at = player.body().position();

        let fall_started = clock.time;
        let mut fall_time = None;
        while clock.time - fall_started < MAX_SIMULATION_TIME {
            clock.step(&mut player, "fall");
            if player.body().is_grounded() {
                fall_time = Some(clock.time - fall_started);
                break;
            }
        }

        eprintln!();
        eprintln!("# === grapple-sim ===");
        eprintln!("# Cursor locked: {}", player.cursor().locked);
        eprintln!(
            "# Config: pull_speed {:.1} m/s, max_distance {:.1} m, weight {:.2}, dt {:.4} s",
            args.pull_speed, args.max_distance, args.weight, args.dt
        );
        eprintln!(
            "# Fired from ({:.2}, {:.2}, {:.2}) at pitch {:.1} deg",
            fired_from.x,
            fired_from.y,
            fired_from.z,
            player.look().pitch()
        );
        eprintln!(
            "# Anchor: ({:.2}, {:.2}, {:.2}), {range:.2} m away",
            anchor.x, anchor.y, anchor.z
        );
        match pull_time {
            Some(seconds) => {
                eprintln!("# Pull: released after {seconds:.2} s");
                eprintln!(
                    "#   Released at ({:.2}, {:.2}, {:.2}), {:.3} m from anchor",
                    released_at.x,
                    released_at.y,
                    released_at.z,
                    released_at.distance(anchor)
                );
            }
            None => eprintln!("# Pull: not released within {MAX_SIMULATION_TIME:.0} s"),
        }
        match fall_time {
            Some(seconds) => eprintln!("# Fall: landed after {seconds:.2} s"),
            None => eprintln!("# Fall: still airborne after {MAX_SIMULATION_TIME:.0} s"),
        }

        if pull_time.is_some() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn probe(ceiling: f32) -> PlaneProbe {
            PlaneProbe {
                planes: vec![
                    Plane {
                        height: 0.0,
                        layer: FLOOR_LAYER,
                    },
                    Plane {
                        height: ceiling,
                        layer: CEILING_LAYER,
                    },
                ],
            }
        }

        #[test]
        fn test_probe_hits_ceiling_straight_up() {
            let hit = probe(10.0).cast(
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::Y,
                50.0,
                SurfaceMask::layer(CEILING_LAYER),
            );
            assert_eq!(hit, Some(Vec3::new(0.0, 10.0, 0.0)));
        }

        #[test]
        fn test_probe_respects_range_and_mask() {
            let origin = Vec3::new(0.0, 2.0, 0.0);
            assert_eq!(
                probe(10.0).cast(origin, Vec3::Y, 5.0, SurfaceMask::ALL),
                None
            );
            assert_eq!(
                probe(10.0).cast(origin, Vec3::NEG_Y, 50.0, SurfaceMask::layer(CEILING_LAYER)),
                None
            );
            assert_eq!(
                probe(10.0).cast(origin, Vec3::NEG_Y, 50.0, SurfaceMask::ALL),
                Some(Vec3::ZERO)
            );
        }

        #[test]
        fn test_body_lands_on_floor() {
            let mut body = PlaneBody {
                position: Vec3::new(0.0, 5.0, 0.0),
                ceiling: 30.0,
                grounded: false,
            };
            body.move_by(Vec3::new(1.0, -10.0, 0.0));

            assert!(body.is_grounded());
            assert_eq!(body.position(), Vec3::new(1.0, BODY_HALF_HEIGHT, 0.0));
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn main() -> std::process::ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    sim::run()
}
