//! Game rules that parameterize the renderer.
//!
//! Rules are plain data loaded from JSON. Every field has a default, so a
//! rules file only needs to list the values it overrides:
//!
//! ```
//! use skirmish_world::rules::Rules;
//!
//! let rules = Rules::from_json(r#"{ "general": { "condition_red": 0.3 } }"#).unwrap();
//! assert_eq!(rules.general.condition_red, 0.3);
//! assert_eq!(rules.general.condition_yellow, 0.5);
//! assert_eq!(rules.general.cell_size, 24.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::status::{Pip, Tag};
use crate::WorldError;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Top-level rules document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub general: GeneralRules,
    pub pip_frames: PipFrames,
    pub tag_frames: TagFrames,
}

impl Rules {
    /// Parse and validate a rules document.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), WorldError> {
        let g = &self.general;
        if !(g.condition_red.is_finite() && g.condition_yellow.is_finite()) {
            return Err(invalid("condition thresholds must be finite"));
        }
        if !(0.0..=1.0).contains(&g.condition_red) || !(0.0..=1.0).contains(&g.condition_yellow)
        {
            return Err(invalid(format!(
                "condition thresholds must lie in [0, 1], got red={} yellow={}",
                g.condition_red, g.condition_yellow
            )));
        }
        if g.condition_red > g.condition_yellow {
            return Err(invalid(format!(
                "condition_red ({}) must not exceed condition_yellow ({})",
                g.condition_red, g.condition_yellow
            )));
        }
        if !(g.cell_size.is_finite() && g.cell_size > 0.0) {
            return Err(invalid(format!(
                "cell_size must be positive and finite, got {}",
                g.cell_size
            )));
        }
        for pip in Pip::ALL {
            if self.pip_frames.name(pip).is_empty() {
                return Err(invalid(format!("pip {pip:?} has no frame name")));
            }
        }
        // Tag::None is allowed to have no frame; it is never drawn.
        for tag in [Tag::Fake, Tag::Primary] {
            if self.tag_frames.name(tag).is_empty() {
                return Err(invalid(format!("tag {tag:?} has no frame name")));
            }
        }
        Ok(())
    }
}

fn invalid(details: impl Into<String>) -> WorldError {
    WorldError::InvalidRules {
        details: details.into(),
    }
}

// ---------------------------------------------------------------------------
// GeneralRules
// ---------------------------------------------------------------------------

/// Global tuning values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralRules {
    /// Health fraction below which an actor is in red condition.
    pub condition_red: f32,
    /// Health fraction below which an actor is in yellow condition.
    pub condition_yellow: f32,
    /// Size of a grid cell in world units.
    pub cell_size: f32,
}

impl Default for GeneralRules {
    fn default() -> Self {
        Self {
            condition_red: 0.25,
            condition_yellow: 0.5,
            cell_size: 24.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame-name tables
// ---------------------------------------------------------------------------

/// Sequence names in the pips sprite sheet, one per [`Pip`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipFrames {
    pub empty: String,
    pub green: String,
    pub yellow: String,
    pub red: String,
    pub gray: String,
}

impl PipFrames {
    pub fn name(&self, pip: Pip) -> &str {
        match pip {
            Pip::Empty => &self.empty,
            Pip::Green => &self.green,
            Pip::Yellow => &self.yellow,
            Pip::Red => &self.red,
            Pip::Gray => &self.gray,
        }
    }

    /// The names in [`Pip`] ordinal order.
    pub fn table(&self) -> [&str; Pip::COUNT] {
        Pip::ALL.map(|pip| self.name(pip))
    }
}

impl Default for PipFrames {
    fn default() -> Self {
        Self {
            empty: "pip-empty".to_owned(),
            green: "pip-green".to_owned(),
            yellow: "pip-yellow".to_owned(),
            red: "pip-red".to_owned(),
            gray: "pip-gray".to_owned(),
        }
    }
}

/// Sequence names in the pips sprite sheet, one per [`Tag`] variant.
///
/// [`Tag::None`] maps to an empty name by default: it has no sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagFrames {
    pub none: String,
    pub fake: String,
    pub primary: String,
}

impl TagFrames {
    pub fn name(&self, tag: Tag) -> &str {
        match tag {
            Tag::None => &self.none,
            Tag::Fake => &self.fake,
            Tag::Primary => &self.primary,
        }
    }

    /// The names in [`Tag`] ordinal order.
    pub fn table(&self) -> [&str; Tag::COUNT] {
        Tag::ALL.map(|tag| self.name(tag))
    }
}

impl Default for TagFrames {
    fn default() -> Self {
        Self {
            none: String::new(),
            fake: "tag-fake".to_owned(),
            primary: "tag-primary".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
