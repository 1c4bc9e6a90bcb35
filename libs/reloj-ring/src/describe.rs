//! Diagnostic rendering of a ring

use std::fmt::Display;

use serde::Serialize;

use crate::list::CircularList;

const SEPARATOR: &str = " <-> ";
const CLOSURE: &str = " <-> [circular]";
const EMPTY: &str = "(empty ring)";

/// Forward and backward renderings of a ring plus its size.
///
/// Forward starts at `head`, backward starts at `head.prev`. Each entry is the
/// payload's `Display` text, tagged with ` <- CURRENT` and/or ` <- HEAD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RingStructure {
    pub forward: String,
    pub backward: String,
    pub size: usize,
    pub is_empty: bool,
}

impl<T: Display> CircularList<T> {
    pub fn describe(&self) -> RingStructure {
        let Some(head) = self.head_index() else {
            return RingStructure {
                forward: EMPTY.to_string(),
                backward: EMPTY.to_string(),
                size: 0,
                is_empty: true,
            };
        };

        let forward = self.render(head, |index| self.next_index(index));
        let backward = self.render(self.prev_index(head), |index| self.prev_index(index));

        RingStructure {
            forward,
            backward,
            size: self.len(),
            is_empty: false,
        }
    }

    fn render(&self, start: usize, step: impl Fn(usize) -> usize) -> String {
        let mut entries = Vec::with_capacity(self.len());
        let mut index = start;
        for _ in 0..self.len() {
            if let Some(value) = self.value_at(index) {
                entries.push(self.entry_label(index, value));
            }
            index = step(index);
        }
        format!("{}{}", entries.join(SEPARATOR), CLOSURE)
    }

    fn entry_label(&self, index: usize, value: &T) -> String {
        let mut label = value.to_string();
        if self.current_index() == Some(index) {
            label.push_str(" <- CURRENT");
        }
        if self.head_index() == Some(index) {
            label.push_str(" <- HEAD");
        }
        label
    }
}
