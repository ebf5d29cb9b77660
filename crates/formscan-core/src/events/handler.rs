//! ScanEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing scans.
///
/// Handlers only override the events they care about. `Send + Sync` is
/// required because documents may be scanned on a worker pool.
pub trait ScanEventHandler: Send + Sync {
    fn on_scan_started(&self, _event: &ScanStartedEvent) {}
    fn on_document_scanned(&self, _event: &DocumentScannedEvent) {}
    fn on_extraction_failed(&self, _event: &ExtractionFailedEvent) {}
    fn on_scan_complete(&self, _event: &ScanCompleteEvent) {}
    fn on_scan_failed(&self, _event: &ScanFailedEvent) {}
}
