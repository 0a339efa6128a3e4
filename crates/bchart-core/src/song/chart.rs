use serde::{Deserialize, Serialize};

use crate::config::solo;
use crate::song::{Note, TextEvent};

/// Star power phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Starpower {
    pub tick: u32,
    pub length: u32,
}

impl Starpower {
    pub fn new(tick: u32, length: u32) -> Self {
        Self { tick, length }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoloEdge {
    Start,
    End,
}

/// One end of a solo section. The host keeps a solo as two independent
/// markers rather than a single interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoloMarker {
    pub tick: u32,
    pub edge: SoloEdge,
}

impl SoloMarker {
    pub fn start(tick: u32) -> Self {
        Self {
            tick,
            edge: SoloEdge::Start,
        }
    }

    pub fn end(tick: u32) -> Self {
        Self {
            tick,
            edge: SoloEdge::End,
        }
    }

    /// Host event text for this marker.
    pub fn text(&self) -> &'static str {
        match self.edge {
            SoloEdge::Start => solo::START_TEXT,
            SoloEdge::End => solo::END_TEXT,
        }
    }
}

/// Anything placed on a chart's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartObject {
    Note(Note),
    Starpower(Starpower),
    Solo(SoloMarker),
    Text(TextEvent),
    Section(TextEvent),
}

impl ChartObject {
    /// Builds a local text event, recognising the solo sentinel strings.
    pub fn from_text(tick: u32, text: &str) -> Self {
        match text {
            solo::START_TEXT => Self::Solo(SoloMarker::start(tick)),
            solo::END_TEXT => Self::Solo(SoloMarker::end(tick)),
            _ => Self::Text(TextEvent::new(tick, text)),
        }
    }

    pub fn tick(&self) -> u32 {
        match self {
            Self::Note(n) => n.tick,
            Self::Starpower(sp) => sp.tick,
            Self::Solo(m) => m.tick,
            Self::Text(ev) | Self::Section(ev) => ev.tick,
        }
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Self::Note(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note(_))
    }
}

/// Timeline of one (instrument, difficulty) pair.
///
/// Objects are kept non-decreasing in tick. `note_count` is a cache that is
/// only refreshed by [`Chart::update_cache`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chart {
    objects: Vec<ChartObject>,
    #[serde(skip)]
    note_count: usize,
}

// Two charts are equal when their timelines are; the cache does not count.
impl PartialEq for Chart {
    fn eq(&self, other: &Self) -> bool {
        self.objects == other.objects
    }
}

impl Eq for Chart {}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: Vec<ChartObject>) -> Self {
        let mut chart = Self {
            objects,
            note_count: 0,
        };
        chart.update_cache();
        chart
    }

    pub fn objects(&self) -> &[ChartObject] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<ChartObject> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Appends an object without checking order.
    pub fn push(&mut self, object: ChartObject) {
        self.objects.push(object);
    }

    /// Inserts an object after every object at the same or an earlier tick.
    pub fn insert(&mut self, object: ChartObject) {
        let tick = object.tick();
        let index = self.objects.partition_point(|o| o.tick() <= tick);
        self.objects.insert(index, object);
    }

    /// True when no object is at an earlier tick than the one before it.
    pub fn is_sorted(&self) -> bool {
        self.objects.is_sorted_by_key(ChartObject::tick)
    }

    /// Copy of this chart with objects stably ordered by tick.
    pub fn sorted(&self) -> Self {
        let mut objects = self.objects.clone();
        objects.sort_by_key(ChartObject::tick);
        Self::from_objects(objects)
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.objects.iter().filter_map(ChartObject::as_note)
    }

    pub fn has_notes(&self) -> bool {
        self.objects.iter().any(ChartObject::is_note)
    }

    /// Cached note count as of the last [`Chart::update_cache`].
    pub fn note_count(&self) -> usize {
        self.note_count
    }

    /// Largest tick of any object, or 0 for an empty chart.
    pub fn last_tick(&self) -> u32 {
        self.objects.iter().map(ChartObject::tick).max().unwrap_or(0)
    }

    pub fn update_cache(&mut self) {
        self.note_count = self.notes().count();
    }
}
