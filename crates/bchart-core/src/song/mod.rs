//! Host chart model.
//!
//! This module contains the types the codec reads from and writes into:
//! - `Song` - resolution, tempo map, global events and charts
//! - `Chart`, `ChartObject` - per (instrument, difficulty) timelines
//! - `Note`, `NoteFlags` - notes and their articulation flags
//! - `Instrument`, `Difficulty` - chart identifiers

mod chart;
mod instrument;
mod note;
mod sync;

pub use chart::*;
pub use instrument::*;
pub use note::*;
pub use sync::*;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default ticks per quarter note for new songs.
pub const DEFAULT_RESOLUTION: u32 = 192;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub resolution: u32,
    #[serde(default)]
    pub sync_track: Vec<SyncEvent>,
    #[serde(default)]
    pub events: Vec<GlobalEvent>,
    #[serde(default)]
    charts: BTreeMap<Instrument, BTreeMap<Difficulty, Chart>>,
}

impl Default for Song {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl Song {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            sync_track: Vec::new(),
            events: Vec::new(),
            charts: BTreeMap::new(),
        }
    }

    pub fn add_tempo(&mut self, tempo: Tempo) {
        self.sync_track.push(SyncEvent::Tempo(tempo));
    }

    pub fn add_time_signature(&mut self, ts: TimeSignature) {
        self.sync_track.push(SyncEvent::TimeSignature(ts));
    }

    pub fn add_event(&mut self, tick: u32, text: impl Into<String>) {
        self.events.push(GlobalEvent::Text(TextEvent::new(tick, text)));
    }

    pub fn add_section(&mut self, tick: u32, title: impl Into<String>) {
        self.events
            .push(GlobalEvent::Section(TextEvent::new(tick, title)));
    }

    /// Returns the chart for a track if one has been created.
    pub fn chart(&self, instrument: Instrument, difficulty: Difficulty) -> Option<&Chart> {
        self.charts.get(&instrument)?.get(&difficulty)
    }

    /// Returns the chart for a track, creating an empty one if needed.
    pub fn chart_mut(&mut self, instrument: Instrument, difficulty: Difficulty) -> &mut Chart {
        self.charts
            .entry(instrument)
            .or_default()
            .entry(difficulty)
            .or_default()
    }

    /// Iterates every created chart in instrument then difficulty order.
    pub fn charts(&self) -> impl Iterator<Item = (Instrument, Difficulty, &Chart)> {
        self.charts.iter().flat_map(|(&instrument, diffs)| {
            diffs
                .iter()
                .map(move |(&difficulty, chart)| (instrument, difficulty, chart))
        })
    }

    /// Drops every chart that has no notes, returning how many were removed.
    pub fn remove_charts_without_notes(&mut self) -> usize {
        let mut removed = 0;
        for diffs in self.charts.values_mut() {
            let before = diffs.len();
            diffs.retain(|_, chart| chart.has_notes());
            removed += before - diffs.len();
        }
        self.charts.retain(|_, diffs| !diffs.is_empty());
        removed
    }

    /// Recomputes cached data after bulk edits.
    pub fn update_cache(&mut self) {
        for diffs in self.charts.values_mut() {
            for chart in diffs.values_mut() {
                chart.update_cache();
            }
        }
    }
}
