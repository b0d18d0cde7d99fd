// src/history.rs

// per-slot traffic counters for the rolling window

// dependencies
use std::collections::VecDeque;

/// Length of one accounting slot, in seconds.
pub const SLOT_SIZE: f64 = 1.0;

/// Start of the slot containing `time`, e.g. 13.7 -> 13.0.
pub(crate) fn slot_of(time: f64) -> f64 {
    (time / SLOT_SIZE).floor() * SLOT_SIZE
}

/// Aggregate traffic recorded in one slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketInfo {
    pub bytes: u64,
}

/// Fixed-length traffic history.
/// Index 0 is the slot still being filled, the last index is the oldest closed slot.
#[derive(Debug, Clone)]
pub struct TrafficHistory {
    slots: VecDeque<PacketInfo>,
}

impl TrafficHistory {
    pub fn new(window_size: usize) -> Self {
        Self {
            slots: std::iter::repeat_n(PacketInfo::default(), window_size).collect(),
        }
    }

    /// Close the current slot: drop the oldest entry and open an empty one at index 0.
    pub fn rotate(&mut self) {
        if self.slots.pop_back().is_some() {
            self.slots.push_front(PacketInfo::default());
        }
    }

    /// Add bytes to the open slot.
    pub fn add(&mut self, bytes: u64) {
        if let Some(current) = self.slots.front_mut() {
            current.bytes = current.bytes.saturating_add(bytes);
        }
    }

    /// Total bytes across every slot, open one included.
    pub fn total(&self) -> u64 {
        self.slots.iter().map(|slot| slot.bytes).sum()
    }

    /// Total bytes across closed slots only.
    pub fn closed_total(&self) -> u64 {
        self.slots.iter().skip(1).map(|slot| slot.bytes).sum()
    }

    pub fn current(&self) -> u64 {
        self.slots.front().map(|slot| slot.bytes).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PacketInfo> {
        self.slots.iter()
    }

    /// Copy of the byte counts, newest first.
    pub fn to_vec(&self) -> Vec<u64> {
        self.slots.iter().map(|slot| slot.bytes).collect()
    }
}
