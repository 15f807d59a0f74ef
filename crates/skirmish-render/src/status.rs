//! Pre-bound pip and tag sprites.
//!
//! The frame for a pip or tag is a pure function of its enum value, so the
//! lookups are resolved once when the renderer is built instead of per pip
//! per frame. Resolution goes through [`Animation`] exactly like a one-shot
//! player would, which means a frame name without a sequence in the sheet is
//! caught here, before anything is drawn.

use skirmish_world::rules::Rules;
use skirmish_world::sprite::{Sprite, SpriteId};
use skirmish_world::status::{Pip, Tag};

use crate::animation::{Animation, SpriteSheet};
use crate::RenderError;

/// Current frame of every pip and tag sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSprites {
    pips: [Sprite; Pip::COUNT],
    /// `None` for tags whose frame name is empty.
    tags: [Option<Sprite>; Tag::COUNT],
}

impl StatusSprites {
    /// Resolve every frame name in `rules` against `sheet`.
    pub fn resolve(sheet: &SpriteSheet, rules: &Rules) -> Result<Self, RenderError> {
        let mut pips = [Sprite::new(SpriteId(0), 0.0, 0.0); Pip::COUNT];
        for pip in Pip::ALL {
            pips[pip.ordinal()] = current_frame(sheet, rules.pip_frames.name(pip))?;
        }

        let mut tags = [None; Tag::COUNT];
        for tag in Tag::ALL {
            let name = rules.tag_frames.name(tag);
            if !name.is_empty() {
                tags[tag.ordinal()] = Some(current_frame(sheet, name)?);
            }
        }

        tracing::debug!(sheet = sheet.name(), "status sprites resolved");
        Ok(Self { pips, tags })
    }

    pub fn pip(&self, pip: Pip) -> Sprite {
        self.pips[pip.ordinal()]
    }

    pub fn tag(&self, tag: Tag) -> Option<Sprite> {
        self.tags[tag.ordinal()]
    }
}

fn current_frame(sheet: &SpriteSheet, sequence: &str) -> Result<Sprite, RenderError> {
    let mut player = Animation::new(sheet);
    player.play_repeating(sequence)?;
    player.image().ok_or_else(|| RenderError::EmptySequence {
        sheet: sheet.name().to_owned(),
        sequence: sequence.to_owned(),
    })
}
