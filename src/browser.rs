use std::path::{Path, PathBuf};

use bevy::prelude::*;

use crate::file_picker::{EFFECT_EXTENSIONS, FilePicker};
use crate::persistence::effect_path;
use crate::surface::UiSurface;
use crate::theme::colors;

/// Request produced by the effect browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserAction {
    Open(PathBuf),
    Create(PathBuf),
}

/// "Create or Load Particle Effect" panel state.
#[derive(Resource, Default)]
pub struct EffectBrowser {
    pub new_name: String,
    input_captured: bool,
}

impl EffectBrowser {
    pub fn input_captured(&self) -> bool {
        self.input_captured
    }

    pub fn render(
        &mut self,
        ui: &mut dyn UiSurface,
        current: &Path,
        effects_dir: &Path,
        picker: &dyn FilePicker,
    ) -> Option<BrowserAction> {
        let mut action = None;

        ui.label(&format!("Current - \"{}\"", current.display()));
        if ui.button("Load Effect", true)
            && let Some(path) = picker.pick_file("Load Effect", effects_dir, EFFECT_EXTENSIONS)
        {
            action = Some(BrowserAction::Open(path));
        }

        ui.text_field("New effect name", &mut self.new_name);
        let name = self.new_name.trim();
        let target = effect_path(effects_dir, name);
        let exists = target.exists();
        if ui.button("Create New Effect", !name.is_empty() && !exists) {
            action = Some(BrowserAction::Create(target));
            self.new_name.clear();
        }
        if exists {
            ui.colored_label(
                "File already exists, load it instead or try a new name",
                colors::STATUS_WARNING,
            );
        }

        self.input_captured = ui.text_focused();
        action
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::modules::test_support::QueuedPicker;
    use crate::surface::testing::ScriptedSurface;

    #[test]
    fn load_uses_picked_path() {
        let picker = QueuedPicker::with(vec![Some(PathBuf::from("fx/fire.pfx.ron"))]);
        let mut browser = EffectBrowser::default();
        let mut ui = ScriptedSurface::new();
        ui.press("Load Effect");
        let action = browser.render(&mut ui, Path::new("fx/a.pfx.ron"), Path::new("fx"), picker.as_ref());
        assert_eq!(action, Some(BrowserAction::Open(PathBuf::from("fx/fire.pfx.ron"))));
        assert!(ui.drawn.contains(&"Current - \"fx/a.pfx.ron\"".to_string()));
    }

    #[test]
    fn cancelled_load_does_nothing() {
        let picker = QueuedPicker::with(vec![None]);
        let mut browser = EffectBrowser::default();
        let mut ui = ScriptedSurface::new();
        ui.press("Load Effect");
        assert_eq!(browser.render(&mut ui, Path::new("a"), Path::new("fx"), picker.as_ref()), None);
    }

    #[test]
    fn create_targets_effects_dir() {
        let dir = tempfile::tempdir().unwrap();
        let picker = QueuedPicker::with(Vec::new());
        let mut browser = EffectBrowser::default();
        let mut ui = ScriptedSurface::new();
        ui.set_text("New effect name", "embers").press("Create New Effect");
        let action = browser.render(&mut ui, Path::new("a"), dir.path(), picker.as_ref());
        assert_eq!(action, Some(BrowserAction::Create(dir.path().join("embers.pfx.ron"))));
        assert!(browser.new_name.is_empty());
    }

    #[test]
    fn existing_or_empty_name_disables_create() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("smoke.pfx.ron"), "").unwrap();
        let picker = QueuedPicker::with(Vec::new());

        let mut browser = EffectBrowser::default();
        let mut ui = ScriptedSurface::new();
        browser.render(&mut ui, Path::new("a"), dir.path(), picker.as_ref());
        assert_eq!(ui.disabled, vec!["Create New Effect".to_string()]);

        browser.new_name = "smoke".into();
        let mut ui = ScriptedSurface::new();
        ui.press("Create New Effect");
        let action = browser.render(&mut ui, Path::new("a"), dir.path(), picker.as_ref());
        assert_eq!(action, None);
        assert!(ui.drawn.iter().any(|t| t.starts_with("File already exists")));
    }
}
