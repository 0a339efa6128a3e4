//! Solo region reconciliation.
//!
//! Charts mark a solo with two independent markers, the file stores one
//! `Phrase(Solo, tick, length)` record. The writer pairs markers into
//! phrases; the reader splits phrases back into markers, holding each end
//! marker until the record stream passes its tick.

use tracing::debug;

use crate::song::{Chart, ChartObject, SoloEdge, SoloMarker};

/// Pairs solo start markers with their end markers.
///
/// Returns one entry per chart object: the solo length for a start marker,
/// `None` for everything else. Each start takes the nearest later end marker
/// not already taken; a start without one runs to the chart's last tick.
/// End markers never produce output of their own.
pub fn pair_solos(chart: &Chart) -> Vec<Option<u32>> {
    let objects = chart.objects();
    let mut lengths = vec![None; objects.len()];
    let mut consumed = vec![false; objects.len()];

    for (i, object) in objects.iter().enumerate() {
        let ChartObject::Solo(SoloMarker {
            tick: start,
            edge: SoloEdge::Start,
        }) = *object
        else {
            continue;
        };

        let end = objects
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|&(j, o)| !consumed[j] && is_solo_end(o));

        let end_tick = match end {
            Some((j, o)) => {
                consumed[j] = true;
                o.tick()
            }
            None => {
                let last = chart.last_tick();
                debug!("Unterminated solo at tick {}, closing at {}", start, last);
                last
            }
        };
        lengths[i] = Some(end_tick.saturating_sub(start));
    }

    lengths
}

fn is_solo_end(object: &ChartObject) -> bool {
    matches!(
        object,
        ChartObject::Solo(SoloMarker {
            edge: SoloEdge::End,
            ..
        })
    )
}

/// End markers waiting for the record stream to move past their tick.
///
/// An end marker is emitted only once a record with a greater tick arrives,
/// so it always follows every object at its own tick. A chart that lists an
/// end marker before a same-tick note decodes with the two swapped. Encoding
/// either order gives the same bytes.
#[derive(Debug, Default)]
pub struct PendingSoloEnds {
    ticks: Vec<u32>,
}

impl PendingSoloEnds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Places the start marker now and holds the end marker.
    pub fn open(&mut self, chart: &mut Chart, tick: u32, length: u32) {
        chart.push(ChartObject::Solo(SoloMarker::start(tick)));
        let end = tick.saturating_add(length);
        let index = self.ticks.partition_point(|&t| t <= end);
        self.ticks.insert(index, end);
    }

    /// Emits every held end marker whose tick is before `tick`.
    pub fn flush_before(&mut self, chart: &mut Chart, tick: u32) {
        let due = self.ticks.partition_point(|&t| t < tick);
        for end in self.ticks.drain(..due) {
            chart.push(ChartObject::Solo(SoloMarker::end(end)));
        }
    }

    /// Emits every remaining end marker.
    pub fn flush_all(&mut self, chart: &mut Chart) {
        for end in self.ticks.drain(..) {
            chart.push(ChartObject::Solo(SoloMarker::end(end)));
        }
    }
}
