//! Presentation facade: animation flags and one-shot audio cues
//!
//! Behavior states only flip named boolean animation parameters and ask for
//! a cue to be played once. Mapping those onto an animator and a mixer is
//! the host game's job.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Animation flag names set by the enemy states.
pub mod flags {
    /// Actor is walking somewhere
    pub const MOVING: &str = "moving";
    /// Actor is pursuing its target
    pub const CHASING: &str = "chasing";
}

/// Handle naming an audio cue, e.g. `"enemy/alert"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cue(pub String);

impl Cue {
    /// Create a cue handle
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Cue name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Cue {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Animation and audio capability consumed by behavior states.
pub trait Presentation {
    /// Set a boolean animation parameter.
    fn set_animation_flag(&mut self, name: &str, value: bool);

    /// Play `cue` once, without looping.
    fn play_cue_once(&mut self, cue: &Cue);
}

/// Presentation that records what it was asked to do.
///
/// Used by the headless simulation and by tests; every request is also
/// logged at debug level.
#[derive(Debug, Default)]
pub struct PresentationLog {
    /// Latest value per flag
    flags: FxHashMap<String, bool>,
    /// Cues in play order
    played: Vec<Cue>,
    /// Suppress cue recording
    muted: bool,
}

impl PresentationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value of a flag, `None` if never set
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    /// All cues played so far
    pub fn played(&self) -> &[Cue] {
        &self.played
    }

    /// How often a cue was played
    pub fn play_count(&self, cue: &Cue) -> usize {
        self.played.iter().filter(|played| *played == cue).count()
    }

    /// Mute or unmute cue playback
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl Presentation for PresentationLog {
    fn set_animation_flag(&mut self, name: &str, value: bool) {
        log::debug!("animation flag {name} = {value}");
        self.flags.insert(name.to_owned(), value);
    }

    fn play_cue_once(&mut self, cue: &Cue) {
        if self.muted {
            return;
        }
        log::debug!("play cue {cue}");
        self.played.push(cue.clone());
    }
}
