//! Background scans for interactive callers
//!
//! The scan runs on its own thread and reports through a bounded channel,
//! so a front end can keep drawing progress and issue a stop at any time.
//! Progress events that do not fit in the buffer are dropped; the terminal
//! event is always delivered to a receiver that keeps reading. The findings
//! themselves come back from [`ScanHandle::join`].

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error};

use super::{check_config, panic_message, scan_range, CancelToken, ScanError};
use crate::oracle::PlacementOracle;
use crate::params::ScanParams;
use crate::types::Finding;

/// Events buffered before progress reports start being dropped.
pub const EVENT_BUFFER: usize = 64;

/// Messages sent from a running scan.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanEvent {
    Progress { percent: f64, findings: usize },
    /// Last message of a scan that ran to completion or was cancelled
    Finished { findings: usize },
    /// Last message of a scan that died
    Failed(String),
}

pub struct ScanHandle {
    cancel: CancelToken,
    events: Receiver<ScanEvent>,
    worker: JoinHandle<Result<Vec<Finding>, ScanError>>,
}

/// Check the configuration and start scanning on a background thread.
///
/// Configuration errors come back here, before any thread exists.
pub fn start_scan<O>(oracle: Arc<O>, params: ScanParams) -> Result<ScanHandle, ScanError>
where
    O: PlacementOracle + 'static,
{
    check_config(oracle.as_ref(), &params)?;

    let cancel = CancelToken::new();
    let (tx, events) = mpsc::sync_channel(EVENT_BUFFER);
    let token = cancel.clone();

    let worker = thread::Builder::new()
        .name("seed-scan".to_string())
        .spawn(move || run_scan(oracle.as_ref(), &params, &token, tx))
        .map_err(|e| ScanError::Worker(format!("cannot spawn scan thread: {}", e)))?;

    Ok(ScanHandle {
        cancel,
        events,
        worker,
    })
}

fn run_scan<O: PlacementOracle + ?Sized>(
    oracle: &O,
    params: &ScanParams,
    cancel: &CancelToken,
    tx: SyncSender<ScanEvent>,
) -> Result<Vec<Finding>, ScanError> {
    let result = scan_range(oracle, params, cancel, |progress| {
        let event = ScanEvent::Progress {
            percent: progress.percent,
            findings: progress.findings,
        };
        // A full buffer or a dropped receiver never stalls the scan
        if let Err(TrySendError::Full(_)) = tx.try_send(event) {
            debug!("event buffer full, dropping progress at {:.2}%", progress.percent);
        }
    });

    // Blocks only while a live receiver has a full buffer
    let terminal = match &result {
        Ok(findings) => ScanEvent::Finished {
            findings: findings.len(),
        },
        Err(e) => {
            error!("scan failed: {}", e);
            ScanEvent::Failed(e.to_string())
        }
    };
    let _ = tx.send(terminal);
    result
}

impl ScanHandle {
    /// Ask the scan to stop before its next seed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Events from the scan. The channel closes once the scan thread exits.
    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.events
    }

    /// Wait for the scan thread and return its findings. Unread events are
    /// discarded.
    pub fn join(self) -> Result<Vec<Finding>, ScanError> {
        // Closing the receiver first keeps the terminal send from blocking
        drop(self.events);
        self.worker
            .join()
            .map_err(|payload| ScanError::Worker(panic_message(payload.as_ref())))?
    }
}
