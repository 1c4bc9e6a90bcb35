use std::sync::atomic::{AtomicI64, Ordering};

/// Millisecond-timestamp ids that never repeat.
///
/// Two creates inside the same millisecond (or a clock stepping backwards)
/// get `last + 1` instead of a duplicate.
#[derive(Debug, Default)]
pub struct AlarmIdGenerator {
    last: AtomicI64,
}

impl AlarmIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, now_ms: i64) -> i64 {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_ms.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}
