//! Bevy wiring: resources, messages and systems that drive the editor.

use std::path::PathBuf;
use std::sync::Arc;

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPlugin, EguiPrimaryContextPass, egui};
use bevy_emitter_data::EmitterRecord;

use crate::browser::{BrowserAction, EffectBrowser};
use crate::egui_surface::EguiSurface;
use crate::file_picker::{FilePicker, NativeFilePicker};
use crate::modules::ModuleContext;
use crate::particle_editor::ParticleEditor;
use crate::persistence::{DocumentStore, RonDocumentStore};
use crate::settings::EditorSettings;
use crate::theme::{ThemeApplied, apply_editor_theme};

/// Emitter configuration changed; the simulation should update in place.
#[derive(Message, Clone, Debug)]
pub struct EmitterDataChanged {
    pub records: Vec<EmitterRecord>,
    pub position: Vec3,
}

/// The emitter set changed; the simulation should rebuild every emitter.
#[derive(Message, Clone, Debug)]
pub struct RespawnRequested {
    pub records: Vec<EmitterRecord>,
    pub position: Vec3,
}

/// Replace the edited effect with an existing document.
#[derive(Message, Clone, Debug)]
pub struct OpenEffect {
    pub path: PathBuf,
}

/// Create a new document and edit it.
#[derive(Message, Clone, Debug)]
pub struct CreateEffect {
    pub path: PathBuf,
}

/// Set while an editor text field has keyboard focus, so the host can ignore
/// gameplay input.
#[derive(Resource, Default)]
pub struct EditorInputCapture(pub bool);

/// Injected file picker and document store.
#[derive(Resource, Clone)]
pub struct EditorServices {
    pub picker: Arc<dyn FilePicker>,
    pub store: Arc<dyn DocumentStore>,
}

impl Default for EditorServices {
    fn default() -> Self {
        Self {
            picker: Arc::new(NativeFilePicker),
            store: Arc::new(RonDocumentStore),
        }
    }
}

impl EditorServices {
    fn module_context(&self, settings: &EditorSettings) -> ModuleContext {
        ModuleContext {
            picker: self.picker.clone(),
            canvas_size: settings.canvas_size(),
            texture_dir: settings.texture_dir.clone(),
        }
    }
}

pub struct ParticleEditorPlugin;

impl Plugin for ParticleEditorPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }
        if !app.world().contains_resource::<EditorSettings>() {
            app.insert_resource(EditorSettings::load());
        }
        if !app.world().contains_resource::<EditorServices>() {
            app.init_resource::<EditorServices>();
        }

        app.init_resource::<ThemeApplied>()
            .init_resource::<EffectBrowser>()
            .init_resource::<EditorInputCapture>()
            .add_message::<EmitterDataChanged>()
            .add_message::<RespawnRequested>()
            .add_message::<OpenEffect>()
            .add_message::<CreateEffect>()
            .add_systems(Startup, open_default_effect)
            .add_systems(
                Update,
                (handle_effect_requests, resolve_pending_deletions)
                    .chain()
                    .run_if(resource_exists::<ParticleEditor>),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    apply_editor_theme,
                    (draw_effect_browser, draw_particle_editor)
                        .chain()
                        .run_if(resource_exists::<ParticleEditor>),
                )
                    .chain(),
            )
            .add_systems(Last, sync_simulation.run_if(resource_exists::<ParticleEditor>));
    }
}

/// Open the configured effect, creating it when it does not exist yet.
fn open_default_effect(mut commands: Commands, settings: Res<EditorSettings>, services: Res<EditorServices>) {
    let path = settings.default_effect_path();
    let context = services.module_context(&settings);
    let result = if path.exists() {
        ParticleEditor::open(&path, services.store.clone(), context.clone())
    } else {
        ParticleEditor::create(&path, services.store.clone(), context.clone())
    };

    let mut editor = match result {
        Ok(editor) => editor,
        Err(e) => {
            let mut editor =
                ParticleEditor::from_records(&path, &[EmitterRecord::default()], services.store.clone(), context);
            editor.record_error("Failed to open effect", &e);
            editor
        }
    };
    editor.request_respawn();
    commands.insert_resource(editor);
}

fn handle_effect_requests(
    mut commands: Commands,
    mut opens: MessageReader<OpenEffect>,
    mut creates: MessageReader<CreateEffect>,
    settings: Res<EditorSettings>,
    services: Res<EditorServices>,
    mut editor: ResMut<ParticleEditor>,
) {
    let context = services.module_context(&settings);
    let requests = opens
        .read()
        .map(|m| (m.path.clone(), false))
        .chain(creates.read().map(|m| (m.path.clone(), true)));

    // Only the last request of the frame survives.
    let mut replacement = None;
    for (path, create) in requests {
        let result = if create {
            ParticleEditor::create(&path, services.store.clone(), context.clone())
        } else {
            ParticleEditor::open(&path, services.store.clone(), context.clone())
        };
        match result {
            Ok(new_editor) => replacement = Some(new_editor),
            Err(e) => editor.record_error("Failed to open effect", &e),
        }
    }

    if let Some(mut new_editor) = replacement {
        new_editor.spawn_position = editor.spawn_position;
        new_editor.request_respawn();
        commands.insert_resource(new_editor);
    }
}

/// Deletions requested during the previous frame's UI pass.
fn resolve_pending_deletions(mut editor: ResMut<ParticleEditor>) {
    if let Err(e) = editor.remove_marked_emitters() {
        editor.record_error("Failed to save effect", &e);
    }
}

fn draw_effect_browser(
    mut contexts: EguiContexts,
    mut browser: ResMut<EffectBrowser>,
    editor: Res<ParticleEditor>,
    settings: Res<EditorSettings>,
    services: Res<EditorServices>,
    mut opens: MessageWriter<OpenEffect>,
    mut creates: MessageWriter<CreateEffect>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut action = None;
    egui::Window::new("Create or Load Particle Effect")
        .default_pos([16.0, 16.0])
        .resizable(false)
        .show(ctx, |ui| {
            action = browser.render(
                &mut EguiSurface::new(ui),
                editor.path(),
                &settings.effects_dir,
                services.picker.as_ref(),
            );
        });

    match action {
        Some(BrowserAction::Open(path)) => {
            opens.write(OpenEffect { path });
        }
        Some(BrowserAction::Create(path)) => {
            creates.write(CreateEffect { path });
        }
        None => {}
    }
}

fn draw_particle_editor(
    mut contexts: EguiContexts,
    mut editor: ResMut<ParticleEditor>,
    browser: Res<EffectBrowser>,
    mut capture: ResMut<EditorInputCapture>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let title = format!("Particle System Editor - {}", editor.effect_name());
    egui::Window::new(title)
        .id(egui::Id::new("particle_system_editor"))
        .default_pos([16.0, 180.0])
        .default_width(460.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| editor.render(&mut EguiSurface::new(ui)));
        });

    capture.0 = editor.input_captured() || browser.input_captured();
}

/// Hand fresh record copies to the simulation, then clear dirtiness.
fn sync_simulation(
    mut editor: ResMut<ParticleEditor>,
    mut last_position: Local<Option<Vec3>>,
    mut respawns: MessageWriter<RespawnRequested>,
    mut changes: MessageWriter<EmitterDataChanged>,
) {
    let respawn = editor.take_respawn_request();
    let position = editor.spawn_position;
    let moved = last_position.is_some_and(|last| last != position);
    *last_position = Some(position);

    if !respawn && !moved && !editor.is_editor_data_dirty() {
        return;
    }

    let records = editor.latest_emitter_data();
    if respawn {
        respawns.write(RespawnRequested { records, position });
    } else {
        changes.write(EmitterDataChanged { records, position });
    }
    editor.set_editor_data_dirty(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_support;

    #[derive(Resource, Default)]
    struct Received {
        respawns: Vec<RespawnRequested>,
        changes: Vec<EmitterDataChanged>,
    }

    fn collect(
        mut received: ResMut<Received>,
        mut respawns: MessageReader<RespawnRequested>,
        mut changes: MessageReader<EmitterDataChanged>,
    ) {
        received.respawns.extend(respawns.read().cloned());
        received.changes.extend(changes.read().cloned());
    }

    fn app(names: &[&str]) -> App {
        let records: Vec<_> = names.iter().map(|n| EmitterRecord::named(*n)).collect();
        let editor = ParticleEditor::from_records(
            "fx/test.pfx.ron",
            &records,
            Arc::new(RonDocumentStore),
            test_support::context(),
        );
        let mut app = App::new();
        app.insert_resource(editor)
            .init_resource::<Received>()
            .add_message::<RespawnRequested>()
            .add_message::<EmitterDataChanged>()
            .add_systems(Last, (sync_simulation, collect).chain());
        app
    }

    #[test]
    fn respawn_request_is_forwarded_once() {
        let mut app = app(&["A", "B"]);
        app.world_mut().resource_mut::<ParticleEditor>().request_respawn();
        app.update();
        app.update();

        let received = app.world().resource::<Received>();
        assert_eq!(received.respawns.len(), 1);
        assert_eq!(received.respawns[0].records.len(), 2);
        assert!(received.changes.is_empty());
    }

    #[test]
    fn dirty_modules_send_changes_and_clear() {
        let mut app = app(&["A"]);
        app.update();
        {
            let mut editor = app.world_mut().resource_mut::<ParticleEditor>();
            let window = &mut editor.windows_mut()[0];
            window.modules_mut().emission.rate = 42.0;
            window.set_all_modules_dirty(true);
        }
        app.update();
        app.update();

        let received = app.world().resource::<Received>();
        assert_eq!(received.changes.len(), 1);
        assert_eq!(received.changes[0].records[0].emission_rate, 42.0);
        assert!(!app.world().resource::<ParticleEditor>().is_editor_data_dirty());
    }

    #[test]
    fn moving_the_spawn_position_sends_changes() {
        let mut app = app(&["A"]);
        app.update();
        app.world_mut().resource_mut::<ParticleEditor>().spawn_position = Vec3::X;
        app.update();

        let received = app.world().resource::<Received>();
        assert_eq!(received.changes.len(), 1);
        assert_eq!(received.changes[0].position, Vec3::X);
    }
}
