use alloc::borrow::Cow;
use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Named board preset. The label doubles as the key for best times.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    label: Cow<'static, str>,
    config: GameConfig,
}

impl Difficulty {
    pub const EASY: Self = Self::preset("easy", (10, 10), 15);
    pub const MEDIUM: Self = Self::preset("medium", (15, 15), 35);
    pub const HARD: Self = Self::preset("hard", (20, 20), 80);

    pub const PRESETS: [Self; 3] = [Self::EASY, Self::MEDIUM, Self::HARD];

    const fn preset(label: &'static str, size: Pos, mines: CellCount) -> Self {
        Self {
            label: Cow::Borrowed(label),
            config: GameConfig::new_unchecked(size, mines),
        }
    }

    pub fn custom(label: impl Into<String>, config: GameConfig) -> Self {
        Self {
            label: Cow::Owned(label.into()),
            config,
        }
    }

    /// Looks up a built-in preset by label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.label.eq_ignore_ascii_case(label))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::EASY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_leave_room_for_a_safe_first_click() {
        for preset in Difficulty::PRESETS {
            let config = preset.config();
            assert_eq!(
                GameConfig::try_new(config.size, config.mines),
                Ok(config),
                "{}",
                preset.label()
            );
        }
    }

    #[test]
    fn lookup_by_label() {
        assert_eq!(Difficulty::from_label("medium"), Some(Difficulty::MEDIUM));
        assert_eq!(Difficulty::from_label("HARD"), Some(Difficulty::HARD));
        assert_eq!(Difficulty::from_label("nightmare"), None);
    }

    #[test]
    fn custom_preset_keeps_its_label() {
        let custom = Difficulty::custom("tiny", GameConfig::new((4, 4), 2));
        assert_eq!(custom.label(), "tiny");
        assert_eq!(custom.config().total_cells(), 16);
    }
}
