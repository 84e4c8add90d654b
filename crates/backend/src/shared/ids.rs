use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Источник отметок времени (unix millis) для ID новых компаний.
///
/// Отметки строго возрастают, даже если две компании создаются
/// в одну и ту же миллисекунду, поэтому ID никогда не повторяются.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: Arc<AtomicI64>,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => now.max(prev + 1),
        }
    }
}
