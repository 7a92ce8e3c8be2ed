//! Fractional progress notifications.

/// Steps between notifications when `total / 100` rounds down to zero.
const FALLBACK_INTERVAL: usize = 1000;

/// Reports progress of one phase of a generation as a percentage.
///
/// A phase covers the range `offset..offset + span` of the overall 0-100
/// scale. Notifications fire on step 0 and every `interval` steps after.
pub struct ProgressReporter<'a> {
    sink: &'a mut dyn FnMut(f64),
    total: usize,
    interval: usize,
    offset: f64,
    span: f64,
    last: f64,
}

impl<'a> ProgressReporter<'a> {
    /// Reporter covering the whole 0-100 range.
    pub fn new(sink: &'a mut dyn FnMut(f64), total: usize) -> Self {
        let interval = match total / 100 {
            0 => FALLBACK_INTERVAL,
            n => n,
        };
        Self {
            sink,
            total,
            interval,
            offset: 0.0,
            span: 100.0,
            last: 0.0,
        }
    }

    /// Restrict subsequent notifications to `offset..offset + span`.
    pub fn phase(&mut self, offset: f64, span: f64) {
        self.offset = offset;
        self.span = span;
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Record that step `i` of the current phase is about to complete.
    #[inline]
    pub fn tick(&mut self, i: usize) {
        if i % self.interval == 0 {
            let value = self.offset + (i as f64 / self.total as f64) * self.span;
            self.emit(value);
        }
    }

    /// Emit the final 100% notification.
    pub fn finish(&mut self) {
        self.emit(100.0);
    }

    fn emit(&mut self, value: f64) {
        let value = value.max(self.last);
        self.last = value;
        (self.sink)(value);
    }
}
