//! Headless demo: a captain walks across the island toward the treasure
//! chest while a skeleton and a shark hunt him.
//!
//! Usage: `character-engine [config.ron|config.json]`

use character_engine::animation::{AQUATIC_ANIMATIONS, HUMANOID_ANIMATIONS};
use character_engine::prelude::*;
use winit::event::ElementState;

const PLAYER: ActorId = ActorId(1);
const SKELETON: ActorId = ActorId(2);
const SHARK: ActorId = ActorId(3);

const MAX_SECONDS: f32 = 30.0;
const PLAYER_HEALTH: f32 = 100.0;

/// Stand-in clip lengths for the demo rigs
fn clip_duration(name: AnimationName) -> f32 {
    match name {
        AnimationName::Idle | AnimationName::Swim => 2.0,
        AnimationName::Walk => 1.0,
        AnimationName::Run | AnimationName::SwimFast => 0.7,
        AnimationName::Attack | AnimationName::Bite => 1.2,
        AnimationName::Death => 2.5,
        AnimationName::Jump | AnimationName::JumpLand => 0.4,
        _ => 1.0,
    }
}

fn clips(names: &[AnimationName]) -> Vec<AnimationClip> {
    names
        .iter()
        .map(|name| AnimationClip::new(name.as_str(), clip_duration(*name)))
        .collect()
}

fn standing_at(config: &SimulationConfig, x: f32, z: f32) -> Transform {
    let y = config.capsule.center_to_bottom() + config.sweep.offset;
    Transform::from_position(Vec3::new(x, y, z))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let dt = config.dt();

    // World
    let mut world = PhysicsWorld::new();
    world.add_ground(0.0, 50.0);
    world.add_obstacle(Vec3::new(3.0, 0.15, 6.0), Quat::IDENTITY, Vec3::new(1.0, 0.15, 1.0));
    let chest = world.add_sensor(Vec3::new(0.0, 1.0, 25.0), Vec3::splat(2.0));

    // Actors
    let mut player = Actor::spawn(
        PLAYER,
        &ActorDescriptor::humanoid(standing_at(&config, 0.0, 0.0), clips(&HUMANOID_ANIMATIONS)),
        &mut world,
        &config,
    )?;

    let skeleton_spawn = Transform::from_position_rotation(
        standing_at(&config, 8.0, 12.0).position,
        Quat::from_rotation_y(std::f32::consts::PI),
    );
    let mut npcs = vec![
        Actor::spawn(
            SKELETON,
            &ActorDescriptor::humanoid(skeleton_spawn, clips(&HUMANOID_ANIMATIONS))
                .with_npc(config.npc.clone()),
            &mut world,
            &config,
        )?,
        Actor::spawn(
            SHARK,
            &ActorDescriptor::aquatic(
                Transform::from_position(Vec3::new(-12.0, config.movement.fall_threshold, 18.0)),
                clips(&AQUATIC_ANIMATIONS),
            )
            .with_npc(
                config
                    .npc
                    .clone()
                    .with_detection_range(40.0)
                    .with_attack_range(6.0)
                    .with_attack_cooldown(3.0),
            ),
            &mut world,
            &config,
        )?,
    ];

    // Populate the query pipeline before the first sweep
    world.step(dt);

    let mut keyboard = KeyboardInput::with_defaults();
    keyboard.process_keyboard(KeyCode::KeyW, ElementState::Pressed);

    let mut events = EventQueue::new();
    let mut clock = SimClock::new();
    let mut health = PLAYER_HEALTH;
    let mut outcome = None;

    while clock.elapsed() < MAX_SECONDS {
        let now = clock.advance(dt);
        events.swap();

        for event in events.drain() {
            match event {
                ActorEvent::DamageDealt {
                    attacker,
                    target: PLAYER,
                    amount,
                } if !player.is_dead() => {
                    health -= amount;
                    log::info!("{attacker} hit the captain for {amount}, health {health}");
                    let reaction = if health <= 0.0 {
                        AnimationName::Death
                    } else {
                        AnimationName::HitReact
                    };
                    player.set_animation_state(reaction)?;
                }
                ActorEvent::SensorTouched {
                    sensor,
                    actor: PLAYER,
                } if sensor == chest => {
                    outcome = Some("the captain reached the chest");
                }
                ActorEvent::AnimationChanged { actor, from, to } => {
                    log::debug!("{actor}: {from} -> {to}");
                }
                ActorEvent::Respawned { actor, position } => {
                    log::info!("{actor} respawned at {position}");
                }
                _ => {}
            }
        }

        if player.is_dead() {
            outcome = Some("the captain was defeated");
        }
        if outcome.is_some() {
            break;
        }

        // Break into a run after a few seconds
        if (now - 3.0).abs() < dt / 2.0 {
            keyboard.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        }
        player.set_input(keyboard.contract());

        let target = player.as_target();
        let mut ctx = TickContext {
            now,
            target: Some(target),
            events: &mut events,
        };
        player.update(dt, &mut world, &mut ctx);
        for npc in &mut npcs {
            npc.update(dt, &mut world, &mut ctx);
        }

        world.step(dt);

        if clock.ticks() % u64::from(config.tick_rate.max(1)) == 0 {
            log::info!(
                "t={now:.1}s captain at {:.2} ({}), skeleton {}, shark {}",
                player.transform().position,
                player.animation_state(),
                npcs[0].animation_state(),
                npcs[1].animation_state(),
            );
        }
    }

    log::info!(
        "finished after {:.1}s ({} ticks): {}",
        clock.elapsed(),
        clock.ticks(),
        outcome.unwrap_or("time ran out")
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Demo error: {e}");
        std::process::exit(1);
    }
}
