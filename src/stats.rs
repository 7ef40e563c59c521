//! Per-run outcome aggregation.

use std::time::Duration;

use crate::download::{FileOutcome, Outcome};

/// Aggregated result of one work's download run.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Number of files successfully downloaded.
    pub downloaded: usize,
    /// Number of files skipped (already existed).
    pub skipped: usize,
    /// Number of files that failed.
    pub failed: usize,
    /// Total bytes downloaded.
    pub bytes: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl SessionStats {
    /// Builds stats from a run's outcome sequence.
    #[must_use]
    pub fn from_outcomes(outcomes: &[FileOutcome], elapsed: Duration) -> Self {
        let mut stats = Self {
            elapsed,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome.outcome {
                Outcome::Succeeded => {
                    stats.downloaded += 1;
                    stats.bytes += outcome.bytes;
                }
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Failed(_) => stats.failed += 1,
            }
        }
        stats
    }

    /// Total number of file outcomes in the run.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }

    /// Average download speed in bytes per second.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn average_speed(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.bytes as f64 / secs) as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcome(path: &str, bytes: u64, outcome: Outcome) -> FileOutcome {
        FileOutcome {
            path: PathBuf::from(path),
            bytes,
            outcome,
        }
    }

    #[test]
    fn aggregates_outcomes() {
        let outcomes = [
            outcome("a", 100, Outcome::Succeeded),
            outcome("b", 0, Outcome::Skipped),
            outcome("c", 0, Outcome::Failed("x".to_string())),
            outcome("d", 50, Outcome::Succeeded),
        ];
        let stats = SessionStats::from_outcomes(&outcomes, Duration::from_secs(3));
        assert_eq!(stats.downloaded, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.bytes, 150);
        assert_eq!(stats.total(), 4);
        assert_eq!(stats.average_speed(), 50);
    }

    #[test]
    fn empty_run_has_zero_speed() {
        let stats = SessionStats::from_outcomes(&[], Duration::ZERO);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.average_speed(), 0);
    }
}
