//! Sprite sheets and the sequence player that picks frames from them.
//!
//! A [`SpriteSheet`] is a named collection of frame sequences, e.g. the
//! `"pips"` sheet with one sequence per status marker. An [`Animation`] plays
//! one sequence at a time and exposes its current frame.

use std::collections::HashMap;

use skirmish_world::rules::{PipFrames, TagFrames};
use skirmish_world::sprite::{Sprite, SpriteId};
use skirmish_world::status::{Pip, Tag};

use crate::RenderError;

// ---------------------------------------------------------------------------
// SpriteSheet
// ---------------------------------------------------------------------------

/// Named frame sequences sharing one backing image.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    name: String,
    sequences: HashMap<String, Vec<Sprite>>,
}

/// Pixel size of a pip frame in the standard sheet.
const PIP_FRAME_SIZE: f32 = 3.0;
/// Pixel size of a tag frame in the standard sheet.
const TAG_FRAME_SIZE: f32 = 6.0;

impl SpriteSheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            sequences: HashMap::new(),
        }
    }

    /// Add (or replace) a sequence.
    pub fn add_sequence(&mut self, sequence: &str, frames: Vec<Sprite>) {
        self.sequences.insert(sequence.to_owned(), frames);
    }

    pub fn with_sequence(mut self, sequence: &str, frames: Vec<Sprite>) -> Self {
        self.add_sequence(sequence, frames);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self, sequence: &str) -> Option<&[Sprite]> {
        self.sequences.get(sequence).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// A `"pips"` sheet holding a single-frame sequence for every default
    /// pip and tag frame name, with sprite ids counting up from `first`
    /// in ordinal order (pips, then the drawable tags).
    pub fn standard_pips(first: SpriteId) -> Self {
        let pips = PipFrames::default();
        let tags = TagFrames::default();
        let mut sheet = SpriteSheet::new("pips");
        let mut next = first.0;

        for pip in Pip::ALL {
            let sprite = Sprite::new(SpriteId(next), PIP_FRAME_SIZE, PIP_FRAME_SIZE);
            sheet.add_sequence(pips.name(pip), vec![sprite]);
            next += 1;
        }
        for tag in [Tag::Fake, Tag::Primary] {
            let sprite = Sprite::new(SpriteId(next), TAG_FRAME_SIZE, TAG_FRAME_SIZE);
            sheet.add_sequence(tags.name(tag), vec![sprite]);
            next += 1;
        }
        sheet
    }
}

// ---------------------------------------------------------------------------
// Animation
// ---------------------------------------------------------------------------

/// Plays one sequence of a [`SpriteSheet`].
#[derive(Debug, Clone)]
pub struct Animation<'s> {
    sheet: &'s SpriteSheet,
    frames: &'s [Sprite],
    frame: usize,
    repeating: bool,
}

impl<'s> Animation<'s> {
    /// A player bound to `sheet` with nothing playing yet.
    pub fn new(sheet: &'s SpriteSheet) -> Self {
        Self {
            sheet,
            frames: &[],
            frame: 0,
            repeating: false,
        }
    }

    /// Start `sequence` from its first frame, looping forever.
    pub fn play_repeating(&mut self, sequence: &str) -> Result<(), RenderError> {
        self.play(sequence, true)
    }

    /// Start `sequence` from its first frame, holding the last frame.
    pub fn play_once(&mut self, sequence: &str) -> Result<(), RenderError> {
        self.play(sequence, false)
    }

    fn play(&mut self, sequence: &str, repeating: bool) -> Result<(), RenderError> {
        let frames = self
            .sheet
            .sequence(sequence)
            .ok_or_else(|| RenderError::MissingSequence {
                sheet: self.sheet.name().to_owned(),
                sequence: sequence.to_owned(),
            })?;
        if frames.is_empty() {
            return Err(RenderError::EmptySequence {
                sheet: self.sheet.name().to_owned(),
                sequence: sequence.to_owned(),
            });
        }
        self.frames = frames;
        self.frame = 0;
        self.repeating = repeating;
        Ok(())
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        if self.repeating {
            self.frame = (self.frame + 1) % self.frames.len();
        } else {
            self.frame = (self.frame + 1).min(self.frames.len() - 1);
        }
    }

    /// The current frame, or `None` when nothing is playing.
    pub fn image(&self) -> Option<Sprite> {
        self.frames.get(self.frame).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
