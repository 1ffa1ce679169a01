//! Keyboard shortcuts
//!
//! Maps a pressed key to the `ViewerCommand` it triggers. Descriptor
//! shortcuts come from the registry; the remaining bindings are fixed.

use crate::camera::CameraMode;
use crate::effects::EffectRegistry;
use crate::events::ViewerCommand;

/// Translate a key press into a command.
///
/// Letters are matched case-insensitively. Returns `None` for unbound keys.
pub fn command_for_key(registry: &EffectRegistry, key: char) -> Option<ViewerCommand> {
    if let Some(descriptor) = registry.by_shortcut(key) {
        let id = descriptor.id.clone();
        return Some(if descriptor.is_material() {
            ViewerCommand::ApplyMaterial { id }
        } else {
            ViewerCommand::ToggleEffect { id }
        });
    }

    let command = match key.to_ascii_lowercase() {
        'w' => ViewerCommand::ToggleWireframe,
        'r' => ViewerCommand::SetCameraMode {
            mode: CameraMode::Turntable,
        },
        'c' => ViewerCommand::SetCameraMode {
            mode: CameraMode::Cinematic,
        },
        'v' => ViewerCommand::SetCameraMode { mode: CameraMode::Drift },
        'b' => ViewerCommand::SetCameraMode { mode: CameraMode::Bounce },
        ',' => ViewerCommand::CycleMaterial { step: -1 },
        '.' => ViewerCommand::CycleMaterial { step: 1 },
        _ => return None,
    };
    Some(command)
}

/// Every bound key with its command, descriptor shortcuts first
pub fn bindings(registry: &EffectRegistry) -> Vec<(char, ViewerCommand)> {
    let mut keys: Vec<char> = registry.descriptors().filter_map(|d| d.shortcut).collect();
    keys.extend(['w', 'r', 'c', 'v', 'b', ',', '.']);
    keys.into_iter()
        .filter_map(|key| command_for_key(registry, key).map(|command| (key, command)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::BudgetPolicy;

    fn registry() -> EffectRegistry {
        EffectRegistry::with_builtins(BudgetPolicy::default())
    }

    #[test]
    fn test_material_shortcuts_apply() {
        let registry = registry();
        assert_eq!(
            command_for_key(&registry, '1'),
            Some(ViewerCommand::ApplyMaterial { id: "cinematic".into() })
        );
        assert_eq!(
            command_for_key(&registry, '3'),
            Some(ViewerCommand::ApplyMaterial { id: "normals".into() })
        );
    }

    #[test]
    fn test_effect_shortcuts_toggle() {
        let registry = registry();
        let command = command_for_key(&registry, '4');
        assert!(matches!(command, Some(ViewerCommand::ToggleEffect { .. })));
    }

    #[test]
    fn test_fixed_bindings() {
        let registry = registry();
        assert_eq!(command_for_key(&registry, 'w'), Some(ViewerCommand::ToggleWireframe));
        assert_eq!(
            command_for_key(&registry, 'C'),
            Some(ViewerCommand::SetCameraMode {
                mode: CameraMode::Cinematic
            })
        );
        assert_eq!(
            command_for_key(&registry, ','),
            Some(ViewerCommand::CycleMaterial { step: -1 })
        );
        assert_eq!(command_for_key(&registry, 'q'), None);
    }

    #[test]
    fn test_bindings_cover_catalog() {
        let registry = registry();
        let bound = bindings(&registry);
        let shortcut_count = registry.descriptors().filter(|d| d.shortcut.is_some()).count();
        assert_eq!(bound.len(), shortcut_count + 7);
    }
}
