use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// Show dialogue and verdict at once instead of pacing them.
    pub instant_playback: bool,

    // Speaker → color mapping (extensible)
    pub speaker_colors: HashMap<String, [u8; 4]>,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut speaker_colors = HashMap::new();

        speaker_colors.insert("PlayerOne".into(), [99, 102, 241, 255]);
        speaker_colors.insert("PlayerTwo".into(), [249, 115, 22, 255]);
        speaker_colors.insert("Narrator".into(), [80, 80, 80, 255]);
        speaker_colors.insert("Verdict".into(), [255, 249, 196, 255]);

        Self {
            ui_scale: 1.0,
            instant_playback: false,
            speaker_colors,
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.speaker_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::WHITE)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.speaker_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}
