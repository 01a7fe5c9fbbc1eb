//! Main binary for running the editor standalone.
//!
//! Without a simulation attached, the binary only logs what it would hand
//! over.

use bevy::prelude::*;
use bevy_particle_editor::{EmitterDataChanged, ParticleEditorPlugin, RespawnRequested};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bevy Particle Editor".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ParticleEditorPlugin)
        .add_systems(Startup, setup_camera)
        .add_systems(Update, log_simulation_updates)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera3d::default(), Transform::from_xyz(0.0, 4.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y)));
}

fn log_simulation_updates(
    mut respawns: MessageReader<RespawnRequested>,
    mut changes: MessageReader<EmitterDataChanged>,
) {
    for respawn in respawns.read() {
        info!(
            "Respawn with {} emitter(s) at {:?}",
            respawn.records.len(),
            respawn.position
        );
    }
    for change in changes.read() {
        let names: Vec<&str> = change.records.iter().map(|r| r.name.as_str()).collect();
        info!("Emitter data changed: {:?}", names);
    }
}
