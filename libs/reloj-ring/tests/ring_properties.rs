//! Behavioral properties of the circular ring, driven through the public API

use std::fmt;

use proptest::prelude::*;
use reloj_ring::{CircularList, Keyed, Merge, NodeRef};

#[derive(Debug, Clone, PartialEq)]
struct Reminder {
    id: i64,
    time: String,
    active: bool,
}

/// Partial update; `id` is carried only to prove it gets ignored
#[derive(Debug, Default)]
struct ReminderPatch {
    #[allow(dead_code)]
    id: Option<i64>,
    time: Option<String>,
    active: Option<bool>,
}

impl Keyed for Reminder {
    type Key = i64;

    fn key(&self) -> &i64 {
        &self.id
    }
}

impl Merge for Reminder {
    type Patch = ReminderPatch;

    fn merge(&mut self, patch: ReminderPatch) {
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
    }
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.time)
    }
}

fn reminder(id: i64) -> Reminder {
    Reminder {
        id,
        time: format!("{:02}:00", id % 24),
        active: true,
    }
}

fn ring_with(ids: &[i64]) -> CircularList<Reminder> {
    let mut ring = CircularList::new();
    for &id in ids {
        ring.insert_at_end(reminder(id));
    }
    ring
}

fn current_id(ring: &CircularList<Reminder>) -> Option<i64> {
    ring.current().map(|r| r.id)
}

fn walk(ring: &CircularList<Reminder>, start: NodeRef, steps: usize, forward: bool) -> NodeRef {
    let mut node = start;
    for _ in 0..steps {
        node = if forward {
            ring.next_ref(node).unwrap()
        } else {
            ring.prev_ref(node).unwrap()
        };
    }
    node
}

#[test]
fn test_empty_ring_navigation_yields_nothing() {
    let mut ring: CircularList<Reminder> = CircularList::new();

    assert!(ring.next_item().is_none());
    assert!(ring.prev_item().is_none());
    assert!(ring.current().is_none());
    assert!(ring.reset_current().is_none());
    assert_eq!(ring.len(), 0);
    assert!(ring.is_empty());
}

#[test]
fn test_cursor_wraps_forward() {
    let mut ring = ring_with(&[1, 2, 3]);

    assert_eq!(ring.reset_current().map(|r| r.id), Some(1));
    assert_eq!(ring.next_item().map(|r| r.id), Some(2));
    assert_eq!(ring.next_item().map(|r| r.id), Some(3));
    assert_eq!(ring.next_item().map(|r| r.id), Some(1));
}

#[test]
fn test_cursor_wraps_backward() {
    let mut ring = ring_with(&[1, 2, 3]);

    ring.reset_current();
    assert_eq!(ring.prev_item().map(|r| r.id), Some(3));
    assert_eq!(ring.prev_item().map(|r| r.id), Some(2));
}

#[test]
fn test_deleting_only_id_empties_ring() {
    let mut ring = ring_with(&[42]);

    assert!(ring.delete_by_id(&42));
    assert!(ring.is_empty());
    assert_eq!(ring.len(), 0);
    assert!(ring.current().is_none());
    assert!(ring.iter().next().is_none());
}

#[test]
fn test_update_never_rewrites_id() {
    let mut ring = ring_with(&[1, 2]);
    let patch = ReminderPatch {
        id: Some(999),
        time: Some("07:30".to_string()),
        active: Some(false),
    };

    assert!(ring.update_by_id(&2, patch));
    let updated = ring.search_by_id(&2).cloned().unwrap();
    assert_eq!(updated.id, 2);
    assert_eq!(updated.time, "07:30");
    assert!(!updated.active);
    assert!(ring.search_by_id(&999).is_none());
}

#[test]
fn test_search_then_delete_round_trip() {
    let mut ring = ring_with(&[10, 20]);
    let added = reminder(30);
    ring.insert_at_end(added.clone());

    assert_eq!(ring.search_by_id(&30), Some(&added));
    assert!(ring.delete_by_id(&30));
    assert!(ring.search_by_id(&30).is_none());
}

#[test]
fn test_missing_id_leaves_ring_untouched() {
    let mut ring = ring_with(&[1, 2, 3]);
    let before = ring.to_vec();

    assert!(!ring.update_by_id(
        &9999,
        ReminderPatch {
            time: Some("00:00".to_string()),
            ..Default::default()
        }
    ));
    assert!(!ring.delete_by_id(&9999));
    assert_eq!(ring.to_vec(), before);
}

#[test]
fn test_describe_has_size_entries_each_way() {
    let mut ring = ring_with(&[1, 2, 3, 4]);
    ring.next_item();
    let structure = ring.describe();
    let entries = |s: &str| {
        s.trim_end_matches(" <-> [circular]")
            .split(" <-> ")
            .count()
    };

    assert_eq!(structure.size, 4);
    assert_eq!(entries(&structure.forward), 4);
    assert_eq!(entries(&structure.backward), 4);
    assert!(structure.forward.starts_with("#1 01:00 <- HEAD"));
    assert!(structure.backward.starts_with("#4 04:00"));
}

proptest! {
    #[test]
    fn prop_insert_at_end_preserves_order(ids in prop::collection::hash_set(any::<i64>(), 0..40)) {
        let ids: Vec<i64> = ids.into_iter().collect();
        let ring = ring_with(&ids);

        prop_assert_eq!(ring.len(), ids.len());
        let seen: Vec<i64> = ring.iter().map(|r| r.id).collect();
        prop_assert_eq!(seen, ids);
    }

    #[test]
    fn prop_ring_closes_after_size_hops(len in 1usize..30, start in 0usize..30) {
        let ids: Vec<i64> = (0..len as i64).collect();
        let mut ring = ring_with(&ids);
        for _ in 0..(start % len) {
            ring.next_item();
        }
        let origin = ring.current_ref().unwrap();

        prop_assert_eq!(walk(&ring, origin, len, true), origin);
        prop_assert_eq!(walk(&ring, origin, len, false), origin);
        for step in 0..len {
            let node = walk(&ring, origin, step, true);
            let next = ring.next_ref(node).unwrap();
            prop_assert_eq!(ring.prev_ref(next), Some(node));
        }
    }

    #[test]
    fn prop_deleting_current_lands_on_successor(len in 2usize..20, moves in 0usize..40) {
        let ids: Vec<i64> = (1..=len as i64).collect();
        let mut ring = ring_with(&ids);
        for _ in 0..moves {
            ring.next_item();
        }
        let doomed = current_id(&ring).unwrap();

        let mut preview = ring_with(&ids);
        for _ in 0..moves {
            preview.next_item();
        }
        let successor = preview.next_item().map(|r| r.id);

        prop_assert!(ring.delete_by_id(&doomed));
        prop_assert_eq!(current_id(&ring), successor);
        prop_assert_eq!(ring.len(), len - 1);
    }

    #[test]
    fn prop_cursor_returns_home_after_size_steps(len in 1usize..25, forward in any::<bool>()) {
        let ids: Vec<i64> = (0..len as i64).collect();
        let mut ring = ring_with(&ids);
        let home = current_id(&ring);
        for _ in 0..len {
            if forward {
                ring.next_item();
            } else {
                ring.prev_item();
            }
        }
        prop_assert_eq!(current_id(&ring), home);
    }

    #[test]
    fn prop_mixed_operations_keep_count_and_closure(
        ops in prop::collection::vec((0u8..4, 0i64..16), 1..80)
    ) {
        let mut ring: CircularList<Reminder> = CircularList::new();
        let mut model: Vec<i64> = Vec::new();

        for (op, id) in ops {
            match op {
                0 => {
                    if !model.contains(&id) {
                        ring.insert_at_end(reminder(id));
                        model.push(id);
                    }
                },
                1 => {
                    if !model.contains(&id) {
                        ring.insert_at_beginning(reminder(id));
                        model.insert(0, id);
                    }
                },
                2 => {
                    let removed = ring.delete_by_id(&id);
                    let position = model.iter().position(|&m| m == id);
                    prop_assert_eq!(removed, position.is_some());
                    if let Some(position) = position {
                        model.remove(position);
                    }
                },
                _ => {
                    ring.next_item();
                },
            }

            prop_assert_eq!(ring.len(), model.len());
            let seen: Vec<i64> = ring.iter().map(|r| r.id).collect();
            prop_assert_eq!(&seen, &model);
            if let Some(head) = ring.head_ref() {
                prop_assert_eq!(walk(&ring, head, model.len(), true), head);
                prop_assert!(ring.current().is_some());
            } else {
                prop_assert!(ring.current().is_none());
            }
        }
    }
}
