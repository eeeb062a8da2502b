/// Trailing-edge debounce keyed on an externally supplied clock (seconds).
///
/// A later `schedule` replaces any pending value, so only the most recent
/// input of a burst is delivered once the stream has been quiet for `delay`.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_secs: f64) -> Self {
        Self {
            delay: delay_secs,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T, now: f64) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Seconds until the pending value fires, if any.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| (deadline - now).max(0.0))
    }

    pub fn poll(&mut self, now: f64) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_schedule_supersedes_pending_value() {
        let mut debouncer = Debouncer::new(0.2);
        debouncer.schedule("ap", 0.0);
        debouncer.schedule("apple", 0.1);

        assert_eq!(debouncer.poll(0.25), None);
        assert_eq!(debouncer.poll(0.31), Some("apple"));
        assert_eq!(debouncer.poll(1.0), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(0.1);
        debouncer.schedule(1, 0.0);
        assert_eq!(debouncer.remaining(0.05), Some(0.05));
        debouncer.cancel();
        assert_eq!(debouncer.remaining(0.05), None);
        assert_eq!(debouncer.poll(5.0), None);
    }

    #[test]
    fn formats_counts_with_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
