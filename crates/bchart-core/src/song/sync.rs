use serde::{Deserialize, Serialize};

use crate::config::tempo::BPM_SCALE;

/// Tempo change. `value` is beats-per-minute scaled by 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tempo {
    pub tick: u32,
    pub value: u32,
}

impl Tempo {
    pub fn new(tick: u32, value: u32) -> Self {
        Self { tick, value }
    }

    pub fn from_bpm(tick: u32, bpm: f64) -> Self {
        Self {
            tick,
            value: (bpm * BPM_SCALE as f64).round() as u32,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.value as f64 / BPM_SCALE as f64
    }
}

/// Time signature change; `denominator` is the plain note value (4 for x/4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub tick: u32,
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    pub fn new(tick: u32, numerator: u8, denominator: u8) -> Self {
        Self {
            tick,
            numerator,
            denominator,
        }
    }
}

/// Entry of the song's tempo map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    Tempo(Tempo),
    TimeSignature(TimeSignature),
}

impl SyncEvent {
    pub fn tick(&self) -> u32 {
        match self {
            Self::Tempo(t) => t.tick,
            Self::TimeSignature(ts) => ts.tick,
        }
    }
}

/// Text placed at a tick: lyrics, markers, section names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEvent {
    pub tick: u32,
    pub text: String,
}

impl TextEvent {
    pub fn new(tick: u32, text: impl Into<String>) -> Self {
        Self {
            tick,
            text: text.into(),
        }
    }
}

/// Song-wide event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GlobalEvent {
    Text(TextEvent),
    Section(TextEvent),
}

impl GlobalEvent {
    pub fn tick(&self) -> u32 {
        match self {
            Self::Text(ev) | Self::Section(ev) => ev.tick,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Text(ev) | Self::Section(ev) => &ev.text,
        }
    }
}
