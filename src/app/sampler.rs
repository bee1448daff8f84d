//! Sampling loop
//!
//! Drives `Init → Sampling → Diffing → FilterSort → Render → Wait → Sampling`
//! until the iteration budget runs out, the operator quits or the cancel
//! token fires. Every exit goes through `shutdown`, which is idempotent and
//! also runs on drop.

use std::io;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::system::{CounterSource, SourceError, TaskSource, ThroughputTracker};
use crate::ui::{BatchView, Frame, View, WaitOutcome};

use super::{compute_deltas, sort_records, CancelToken, DeltaRecord, FilterChain, Params, RuntimeConfig, SnapshotStore};

/// Sampling loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Init,
    Sampling,
    Diffing,
    FilterSort,
    Render,
    Wait,
    Shutdown,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The configured number of iterations was rendered
    Exhausted,
    /// The operator pressed quit
    Quit,
    /// A termination request arrived
    Cancelled,
}

#[derive(Debug, Error)]
pub enum SamplerError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("terminal output failed: {0}")]
    Terminal(#[source] io::Error),
}

pub struct Sampler {
    tasks: Box<dyn TaskSource>,
    counters: Box<dyn CounterSource>,
    view: Box<dyn View>,
    store: SnapshotStore,
    throughput: ThroughputTracker,
    config: RuntimeConfig,
    params: Params,
    cancel: CancelToken,
    state: LoopState,
    /// Cycles that produced a frame
    cycles: u64,
    /// Unfiltered records of the latest cycle
    records: Vec<DeltaRecord>,
    /// System-wide throughput of the latest cycle
    current: Option<(f64, f64)>,
    /// Renderer taken over when the interactive one breaks; stdout batch if unset
    fallback: Option<Box<dyn View>>,
}

impl Sampler {
    pub fn new(
        tasks: Box<dyn TaskSource>,
        counters: Box<dyn CounterSource>,
        view: Box<dyn View>,
        config: RuntimeConfig,
        params: Params,
        cancel: CancelToken,
    ) -> Self {
        Self {
            tasks,
            counters,
            view,
            store: SnapshotStore::new(),
            throughput: ThroughputTracker::new(),
            config,
            params,
            cancel,
            state: LoopState::Init,
            cycles: 0,
            records: Vec::new(),
            current: None,
            fallback: None,
        }
    }

    /// Runs until exhaustion, quit or cancellation, then shuts down.
    ///
    /// # Returns
    /// * `Ok(ExitReason)` - the loop ended normally
    /// * `Err(SamplerError)` - the first sample failed, or no renderer works
    pub fn run(&mut self) -> Result<ExitReason, SamplerError> {
        let result = self.run_cycles();
        self.shutdown();
        result
    }

    fn run_cycles(&mut self) -> Result<ExitReason, SamplerError> {
        let mut remaining = self.params.iterations;
        loop {
            if self.cancel.is_cancelled() {
                return Ok(ExitReason::Cancelled);
            }

            if self.sample()? {
                self.cycles += 1;
                self.present()?;
                self.store.retire();
                debug_assert!(self.store.live() <= 2);

                if let Some(left) = remaining.as_mut() {
                    *left = left.saturating_sub(1);
                    if *left == 0 {
                        return Ok(ExitReason::Exhausted);
                    }
                }
            }

            if let Some(reason) = self.wait()? {
                return Ok(reason);
            }
        }
    }

    /// Takes a snapshot and derives this cycle's records.
    ///
    /// Returns false if the cycle was skipped.
    fn sample(&mut self) -> Result<bool, SamplerError> {
        self.transition(LoopState::Sampling);
        let query = self.config.task_query();
        let snapshot = match self.tasks.snapshot(&query) {
            Ok(snapshot) => snapshot,
            Err(e) if self.cycles == 0 => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "task sampling failed, skipping cycle");
                return Ok(false);
            }
        };
        let counters = match self.counters.counters() {
            Ok(counters) => Some(counters),
            Err(e) => {
                warn!(error = %e, "aggregate counters unavailable");
                None
            }
        };
        if snapshot.is_empty() {
            debug!(?query, "no task matched the query");
        } else {
            debug!(tasks = snapshot.len(), processes = query.processes_only, "sampled");
        }

        self.transition(LoopState::Diffing);
        self.store.install(snapshot);
        self.records = match self.store.pair() {
            Some((current, previous)) => compute_deltas(current, previous),
            None => Vec::new(),
        };
        self.current = self.throughput.update(counters);
        Ok(true)
    }

    /// Filters, sorts and renders the latest records.
    ///
    /// An interactive rendering failure falls back to batch output once.
    fn present(&mut self) -> Result<(), SamplerError> {
        self.transition(LoopState::FilterSort);
        let mut visible = FilterChain::from_config(&self.config).apply(&self.records);
        sort_records(
            &mut visible,
            self.config.sort_column,
            self.config.sort_ascending,
            self.config.accumulated,
        );

        self.transition(LoopState::Render);
        let frame = Frame::new(
            &visible,
            self.current,
            &self.config,
            &self.params.display,
            self.params.delay,
            self.cycles,
        );
        if let Err(e) = self.view.render(&frame) {
            Self::swap_to_batch(&mut self.view, &mut self.fallback, e, "rendering")?;
            self.view.render(&frame).map_err(SamplerError::Terminal)?;
        }
        Ok(())
    }

    /// Restores the terminal and swaps in batch output after an
    /// interactive fault. A fault in a non-interactive view is fatal.
    fn fall_back_to_batch(&mut self, e: io::Error, step: &str) -> Result<(), SamplerError> {
        Self::swap_to_batch(&mut self.view, &mut self.fallback, e, step)
    }

    /// Field-level form of `fall_back_to_batch`, usable while other fields
    /// of the sampler are borrowed.
    fn swap_to_batch(
        view: &mut Box<dyn View>,
        fallback: &mut Option<Box<dyn View>>,
        e: io::Error,
        step: &str,
    ) -> Result<(), SamplerError> {
        if !view.is_interactive() {
            return Err(SamplerError::Terminal(e));
        }
        warn!(error = %e, step, "interactive output failed, falling back to batch output");
        if let Err(e) = view.finish() {
            warn!(error = %e, "failed to restore terminal");
        }
        *view = fallback
            .take()
            .unwrap_or_else(|| Box::new(BatchView::stdout()));
        Ok(())
    }

    /// Blocks until the next cycle is due.
    ///
    /// Configuration keys re-present the current records and keep waiting
    /// for the rest of the delay. An interactive input failure switches to
    /// batch output, which waits out the remainder.
    fn wait(&mut self) -> Result<Option<ExitReason>, SamplerError> {
        self.transition(LoopState::Wait);
        let deadline = Instant::now() + self.params.delay;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            let outcome = match self.view.wait(timeout, &self.cancel, &mut self.config) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.fall_back_to_batch(e, "input")?;
                    continue;
                }
            };
            match outcome {
                WaitOutcome::Elapsed | WaitOutcome::Refresh => return Ok(None),
                WaitOutcome::Reconfigured => self.present()?,
                WaitOutcome::Quit => return Ok(Some(ExitReason::Quit)),
                WaitOutcome::Cancelled => return Ok(Some(ExitReason::Cancelled)),
            }
        }
    }

    /// Releases the task source and restores the view. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.state == LoopState::Shutdown {
            return;
        }
        self.transition(LoopState::Shutdown);
        self.tasks.close();
        if let Err(e) = self.view.finish() {
            warn!(error = %e, "failed to restore output");
        }
        info!(cycles = self.cycles, "monitor stopped");
    }

    fn transition(&mut self, next: LoopState) {
        trace!(from = ?self.state, to = ?next, "loop state");
        self.state = next;
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
