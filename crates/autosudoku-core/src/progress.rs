/// Receives percent-complete updates while a solve is running.
///
/// The solver reports after every cell assignment, so implementations that
/// do real work (repainting a progress bar, say) should skip updates whose
/// percentage has not changed.
pub trait ProgressSink {
    /// Called with the current completion percentage, 0..=100
    fn report(&mut self, percent: u8);
}

/// Sink that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn report(&mut self, _percent: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_progress_accepts_updates() {
        let mut sink = NullProgress;
        sink.report(0);
        sink.report(100);
    }
}
