use chrono::{DateTime, Duration, Local};

/// Hands out strictly increasing submission timestamps for one session.
///
/// Request ids truncate the stamp to whole seconds, so uniqueness needs
/// second-granularity separation: a wall clock still inside the previous
/// stamp's second (or behind it) is pushed to one second past that stamp.
#[derive(Debug, Default, Clone)]
pub struct SessionClock {
    last: Option<DateTime<Local>>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp for the next submission, based on the wall clock.
    pub fn next(&mut self) -> DateTime<Local> {
        self.advance(Local::now())
    }

    /// Same as [`next`](Self::next) with the wall clock injected.
    pub fn advance(&mut self, now: DateTime<Local>) -> DateTime<Local> {
        let stamp = match self.last {
            Some(last) if now.timestamp() <= last.timestamp() => last + Duration::seconds(1),
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }
}
