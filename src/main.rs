//! Headless demo: enemies idle, wander and chase a scripted target
//!
//! The target walks a loop of waypoints and, once the objective time has
//! passed, uses the objective item when it walks past it. Every enemy then
//! chases it for the rest of the run.

use std::path::PathBuf;

use clap::Parser;
use sentinel::ai::StateId;
use sentinel::core::{ConfigFormat, load_config, render_config};
use sentinel::interaction::{ColliderId, InteractionOutcome, RaycastHit};
use sentinel::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "sentinel", about = "Run the enemy behavior demo headless")]
struct Args {
    /// Scenario file (.ron or .json); the built-in scenario when omitted
    config: Option<PathBuf>,

    /// Override the simulated duration in seconds
    #[arg(long)]
    duration: Option<f32>,

    /// Print the effective scenario as RON and exit
    #[arg(long)]
    print_config: bool,
}

/// The objective item, as a sphere the "use" ray can hit
struct DemoScene {
    item: ObjectiveItem,
    position: Vec3,
}

impl DemoScene {
    const ITEM: ColliderId = ColliderId(1);
    const RADIUS: f32 = 0.5;
}

impl InteractionScene for DemoScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let along = (self.position - origin).dot(direction);
        let closest = origin + direction * along;
        if along < 0.0 || closest.distance(self.position) > Self::RADIUS {
            return None;
        }
        let distance = (along - Self::RADIUS).max(0.0);
        (distance <= max_distance).then_some(RaycastHit {
            collider: Self::ITEM,
            point: origin + direction * distance,
            distance,
        })
    }

    fn interactable_mut(&mut self, collider: ColliderId) -> Option<&mut dyn Interactable> {
        (collider == Self::ITEM).then_some(&mut self.item as &mut dyn Interactable)
    }
}

/// Moves the target around its waypoint loop
struct PathWalker {
    waypoints: Vec<Vec3>,
    speed: f32,
    next: usize,
}

impl PathWalker {
    fn new(waypoints: Vec<Vec3>, speed: f32) -> Self {
        Self {
            waypoints,
            speed,
            next: 1,
        }
    }

    fn advance(&mut self, from: Vec3, dt: f32) -> Vec3 {
        if self.waypoints.len() < 2 {
            return from;
        }
        let goal = self.waypoints[self.next % self.waypoints.len()];
        let to_goal = goal - from;
        let step = self.speed * dt;
        if to_goal.length() <= step {
            self.next = (self.next + 1) % self.waypoints.len();
            return goal;
        }
        from + to_goal.normalize_or_zero() * step
    }
}

fn log_event(elapsed: f32, event: &GameEvent) {
    match event {
        GameEvent::StateChanged { actor, from, to } => {
            let from = from.map_or("-", StateId::name);
            log::info!("t={elapsed:>6.2}s {actor}: {from} -> {to}");
        }
        GameEvent::ObjectiveActivated => {
            log::info!("t={elapsed:>6.2}s objective activated");
        }
        other => log::debug!("unhandled event {other:?}"),
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config: SimulationConfig = match &args.config {
        Some(path) => {
            log::info!("Loading scenario from {}", path.display());
            load_config(path)?
        }
        None => SimulationConfig {
            duration_seconds: 60.0,
            ..Default::default()
        },
    };
    if let Some(duration) = args.duration {
        config.duration_seconds = duration;
    }

    if args.print_config {
        println!("{}", render_config(&config, ConfigFormat::Ron)?);
        return Ok(());
    }

    let mut simulation = Simulation::from_config(&config)?;
    let mut scene = DemoScene {
        item: ObjectiveItem::new(simulation.objective().clone()),
        position: config.objective_position,
    };
    let interactor = Interactor::default();
    let mut walker = PathWalker::new(config.target_path.clone(), config.target_speed);
    let mut gizmos = Gizmos::new();
    let dt = config.tick_seconds();

    log::info!(
        "Running {} enemies for {:.1}s at {:.0} Hz",
        simulation.enemies().len(),
        config.duration_seconds,
        config.tick_rate_hz
    );

    for _ in 0..config.total_ticks() {
        let target = walker.advance(simulation.target_position(), dt);
        simulation.set_target_position(target);

        let objective_due = config
            .objective_at_seconds
            .is_some_and(|at| simulation.elapsed() >= at);
        if objective_due
            && !scene.item.is_active()
            && target.distance(scene.position) <= interactor.distance
        {
            let outcome = interactor.interact(target, scene.position - target, &mut scene, &mut gizmos);
            if let InteractionOutcome::Activated(_) = outcome {
                log::info!("t={:>6.2}s target used the objective item", simulation.elapsed());
            }
        }

        simulation.step(dt);

        let elapsed = simulation.elapsed();
        for event in simulation.events_mut().drain() {
            log_event(elapsed, &event);
        }
    }

    gizmos.clear();
    simulation.draw_gizmos(&mut gizmos);
    log::debug!("final frame has {} gizmos", gizmos.len());

    for enemy in simulation.enemies() {
        log::info!(
            "{} finished in {} at {} after {} transitions ({} cues)",
            enemy.id(),
            enemy.state().map_or("no state", StateId::name),
            enemy.position(),
            enemy.transition_count(),
            enemy.presentation().played().len()
        );
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
