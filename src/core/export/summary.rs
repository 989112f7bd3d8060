//! Export run summary

use std::time::Duration;

/// Counters collected over one export run
#[derive(Debug, Default, Clone)]
pub struct ExportSummary {
    /// Attribute rows written
    pub records_written: usize,
    /// Features that carried a geometry
    pub geometries_written: usize,
    /// Records skipped by the metadata record cap
    pub records_capped: usize,
    /// Thumbnails that could not be packaged
    pub thumbnails_skipped: usize,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records written without a geometry
    pub fn geometries_skipped(&self) -> usize {
        self.records_written.saturating_sub(self.geometries_written)
    }

    /// One-line report for the CLI and logs
    pub fn report(&self) -> String {
        format!(
            "{} records written ({} with geometry, {} capped, {} thumbnails skipped) in {:.2}s",
            self.records_written,
            self.geometries_written,
            self.records_capped,
            self.thumbnails_skipped,
            self.duration.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometries_skipped() {
        let summary = ExportSummary {
            records_written: 3,
            geometries_written: 2,
            ..Default::default()
        };
        assert_eq!(summary.geometries_skipped(), 1);
    }

    #[test]
    fn test_report_mentions_counts() {
        let summary = ExportSummary {
            records_written: 5,
            geometries_written: 4,
            duration: Duration::from_millis(1500),
            ..Default::default()
        };
        let report = summary.report();
        assert!(report.contains("5 records"));
        assert!(report.contains("1.50s"));
    }
}
