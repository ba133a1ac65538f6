//! Scheduling performance metrics.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::RequestHandle;

/// Aggregate metrics for one scheduler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerMetrics {
    /// Requests ever submitted since the last reset.
    pub total_requests: usize,
    /// Requests that reached completion.
    pub completed_requests: usize,
    /// Requests still queued.
    pub pending_requests: usize,
    /// Mean waiting time over completed requests (ms), 0 with no completions.
    pub average_waiting_ms: f64,
    /// Mean turnaround time over completed requests (ms), 0 with no completions.
    pub average_turnaround_ms: f64,
}

#[derive(Default)]
struct LedgerState {
    completed: usize,
    waiting_sum_ms: u128,
    turnaround_sum_ms: u128,
    in_flight: Vec<RequestHandle>,
}

/// Running completion totals for one scheduler.
///
/// Granted requests stay in `in_flight` only until their completion is
/// observed (completion may be recorded later by the manager). Their times
/// are then folded into the sums and the handle is dropped.
#[derive(Default)]
pub struct CompletionLedger {
    submitted: usize,
    state: Mutex<LedgerState>,
}

impl CompletionLedger {
    /// Count a newly submitted request.
    pub fn submitted(&mut self) {
        self.submitted += 1;
    }

    /// Remember a request on its first grant.
    pub fn served(&mut self, request: RequestHandle) {
        self.state.get_mut().in_flight.push(request);
    }

    /// Move completed requests into the running sums and release their
    /// handles. Returns how many were folded.
    pub fn fold_completed(&self) -> usize {
        let mut state = self.state.lock();
        let LedgerState {
            completed,
            waiting_sum_ms,
            turnaround_sum_ms,
            in_flight,
        } = &mut *state;
        let before = in_flight.len();
        in_flight.retain(|handle| {
            let req = handle.lock();
            if !req.is_completed() {
                return true;
            }
            *completed += 1;
            *waiting_sum_ms += req.waiting_ms();
            *turnaround_sum_ms += req.turnaround_ms();
            false
        });
        before - in_flight.len()
    }

    /// Granted requests whose completion has not been observed yet.
    pub fn in_flight(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    /// Compute metrics given the current queue depth.
    #[allow(clippy::cast_precision_loss)]
    pub fn metrics(&self, pending: usize) -> SchedulerMetrics {
        self.fold_completed();
        let state = self.state.lock();
        let completed = state.completed;
        let average = |sum: u128| {
            if completed == 0 {
                0.0
            } else {
                sum as f64 / completed as f64
            }
        };

        SchedulerMetrics {
            total_requests: self.submitted,
            completed_requests: completed,
            pending_requests: pending,
            average_waiting_ms: average(state.waiting_sum_ms),
            average_turnaround_ms: average(state.turnaround_sum_ms),
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.submitted = 0;
        *self.state.get_mut() = LedgerState::default();
    }
}
