//! Bounded scrollback ring.
//!
//! Slots hold row contents and line lengths. The oldest `retained()` slots
//! starting at the logical start are retired rows; the next
//! [`SCREEN_HEIGHT`] slots track the live grid rows so their line lengths
//! can be kept up to date before they scroll off. The ring has
//! `SCROLLBACK_LINES + SCREEN_HEIGHT` slots, so a live row never shares a
//! slot with a retained one.

use crate::color::Cell;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH, SCROLLBACK_LINES};
use alloc::boxed::Box;
use alloc::vec;

/// One full screen row.
pub type Row = [Cell; SCREEN_WIDTH];

/// Number of slots in the ring.
pub const SLOTS: usize = SCROLLBACK_LINES + SCREEN_HEIGHT;

/// Retired rows plus per-row line lengths.
pub struct Scrollback {
    /// Row storage, allocated on activation.
    rows: Option<Box<[Row]>>,
    /// Last written column + 1, per slot.
    lengths: [u8; SLOTS],
    start: usize,
    count: usize,
}

impl Scrollback {
    /// Creates an inactive ring. Nothing is retained until [`activate`].
    ///
    /// [`activate`]: Scrollback::activate
    pub const fn new() -> Self {
        Self {
            rows: None,
            lengths: [0; SLOTS],
            start: 0,
            count: 0,
        }
    }

    /// Allocates row storage filled with `blank`. Idempotent.
    pub fn activate(&mut self, blank: Cell) {
        if self.rows.is_none() {
            self.rows = Some(vec![[blank; SCREEN_WIDTH]; SLOTS].into_boxed_slice());
        }
    }

    /// Returns true once row storage exists.
    pub fn is_active(&self) -> bool {
        self.rows.is_some()
    }

    /// Number of retired rows held.
    pub fn retained(&self) -> usize {
        self.count
    }

    /// Slot tracking live grid row `row`.
    pub fn slot_for_live_row(&self, row: usize) -> usize {
        (self.start + self.count + row) % SLOTS
    }

    /// Stored line length of `slot`.
    pub fn line_length(&self, slot: usize) -> usize {
        self.lengths[slot % SLOTS] as usize
    }

    /// Sets the stored line length of `slot`, clamped to the row width.
    pub fn set_line_length(&mut self, slot: usize, len: usize) {
        self.lengths[slot % SLOTS] = len.min(SCREEN_WIDTH) as u8;
    }

    /// Fills the row stored in `slot` with `blank` and zeroes its length.
    pub fn clear_slot(&mut self, slot: usize, blank: Cell) {
        let slot = slot % SLOTS;
        self.lengths[slot] = 0;
        if let Some(rows) = self.rows.as_mut() {
            rows[slot] = [blank; SCREEN_WIDTH];
        }
    }

    /// Zeroes the line lengths of every live row.
    pub fn reset_live_lengths(&mut self) {
        for row in 0..SCREEN_HEIGHT {
            let slot = self.slot_for_live_row(row);
            self.lengths[slot] = 0;
        }
    }

    /// Retired row `index`, counting from the oldest.
    pub fn row(&self, index: usize) -> Option<&Row> {
        if index >= self.count {
            return None;
        }
        let rows = self.rows.as_ref()?;
        Some(&rows[(self.start + index) % SLOTS])
    }

    /// Retires the top live row, whose contents are `top`.
    ///
    /// The row is dropped when the ring is inactive. Once full, the oldest
    /// retained row is evicted. The slot of the new bottom live row starts
    /// with zero length.
    pub fn retire(&mut self, top: &Row) {
        match self.rows.as_mut() {
            Some(rows) => {
                let slot = (self.start + self.count) % SLOTS;
                rows[slot] = *top;
                if self.count < SCROLLBACK_LINES {
                    self.count += 1;
                } else {
                    self.start = (self.start + 1) % SLOTS;
                }
            }
            None => self.start = (self.start + 1) % SLOTS,
        }
        let bottom = self.slot_for_live_row(SCREEN_HEIGHT - 1);
        self.lengths[bottom] = 0;
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new()
    }
}
