//! Background icon resolution for the virtual list.
//!
//! One worker thread per list walks the current entry collection and asks
//! the [`IconResolver`] for each unresolved row. The list talks to the
//! worker through a single control channel carrying [`Signal`]s; the
//! worker reports progress as [`ListUpdate`]s.
//!
//! Every collection carries a generation number. The worker re-checks it
//! each time it takes the lock, so a pass that outlives its collection (an
//! interrupt that was not acknowledged in time) can neither write into the
//! replacement nor, through [`VirtualList::poll_updates`], be seen by the UI.
//! Reordering rows keeps the generation: results are stored by path, so a
//! lookup that straddles a re-sort still lands on its row.
//!
//! [`VirtualList::poll_updates`]: crate::nav::list::VirtualList::poll_updates

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{select, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::CoreResult;
use crate::event::ListUpdate;
use crate::fs::icons::{resolve_with_timeout, IconResolver};
use crate::nav::entry::ListEntry;

/// The list's rows plus the generation they belong to.
#[derive(Debug, Default)]
pub struct EntrySet {
    pub generation: u64,
    pub entries: Vec<ListEntry>,
}

/// Collection shared between the list model and the worker.
pub type SharedEntries = Arc<Mutex<EntrySet>>;

/// Control messages understood by the worker.
#[derive(Debug)]
pub enum Signal {
    /// Scan collection `generation` from the top.
    Start { generation: u64 },
    /// Continue scanning `generation` at `index`.
    Next { generation: u64, index: usize },
    /// Abandon the current pass and acknowledge on `ack`.
    Interrupt { ack: Sender<()> },
    /// Stop the worker.
    Exit,
}

/// Worker progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning { generation: u64, next: usize },
    /// The last pass was cut short; equivalent to idle.
    Interrupted,
}

impl ScanState {
    pub fn is_scanning(&self) -> bool {
        matches!(self, ScanState::Scanning { .. })
    }
}

/// Worker timing knobs.
#[derive(Debug, Clone, Copy)]
pub struct PipelineTimings {
    /// Bound on a single resolver call.
    pub resolve_timeout: Duration,
    /// Bound on waiting for an interrupt acknowledgement.
    pub interrupt_timeout: Duration,
    /// Pause between rows, during which control signals are observed.
    pub step_pause: Duration,
}

/// Scan state plus the number of `Start`s the worker has not seen yet.
///
/// While a start is queued the state already describes that pass, so the
/// worker leaves it alone.
#[derive(Debug)]
struct Progress {
    state: ScanState,
    queued_starts: usize,
}

/// Handle to the worker thread. Dropping it stops the worker.
pub struct IconPipeline {
    control: Sender<Signal>,
    progress: Arc<Mutex<Progress>>,
    interrupt_timeout: Duration,
    worker: Option<JoinHandle<()>>,
}

impl IconPipeline {
    /// Spawns the worker.
    ///
    /// # Errors
    ///
    /// [`CoreError::Io`](crate::error::CoreError::Io) if the thread cannot be spawned.
    pub fn spawn(
        entries: SharedEntries,
        resolver: Arc<dyn IconResolver>,
        updates: Sender<ListUpdate>,
        timings: PipelineTimings,
    ) -> CoreResult<Self> {
        let (control, signals) = crossbeam_channel::unbounded();
        let progress = Arc::new(Mutex::new(Progress {
            state: ScanState::Idle,
            queued_starts: 0,
        }));
        let worker = Worker {
            entries,
            resolver,
            updates,
            progress: Arc::clone(&progress),
            resolve_timeout: timings.resolve_timeout,
            step_pause: timings.step_pause,
        };
        let handle = std::thread::Builder::new()
            .name("icon-pipeline".to_owned())
            .spawn(move || worker.run(&signals))?;

        Ok(Self {
            control,
            progress,
            interrupt_timeout: timings.interrupt_timeout,
            worker: Some(handle),
        })
    }

    /// Starts a pass over collection `generation`.
    ///
    /// The state reads as scanning from the moment this returns.
    pub fn start(&self, generation: u64) {
        let mut progress = self.progress.lock();
        progress.queued_starts += 1;
        progress.state = ScanState::Scanning {
            generation,
            next: 0,
        };
        if self.control.send(Signal::Start { generation }).is_err() {
            progress.queued_starts -= 1;
            progress.state = ScanState::Idle;
        }
    }

    /// Interrupts the current pass and waits (bounded) for the worker to go idle.
    ///
    /// Returns `false` if the acknowledgement did not arrive in time. The old
    /// pass then finishes its current row; replacing the rows must bump the
    /// generation so that row's result is dropped.
    pub fn interrupt(&self) -> bool {
        let (ack, acked) = crossbeam_channel::bounded(1);
        if self.control.send(Signal::Interrupt { ack }).is_err() {
            return true;
        }
        match acked.recv_timeout(self.interrupt_timeout) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    "icon worker did not acknowledge interrupt within {:?}",
                    self.interrupt_timeout
                );
                false
            }
        }
    }

    pub fn state(&self) -> ScanState {
        self.progress.lock().state
    }
}

impl Drop for IconPipeline {
    fn drop(&mut self) {
        let _ = self.control.send(Signal::Exit);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

struct Worker {
    entries: SharedEntries,
    resolver: Arc<dyn IconResolver>,
    updates: Sender<ListUpdate>,
    progress: Arc<Mutex<Progress>>,
    resolve_timeout: Duration,
    step_pause: Duration,
}

impl Worker {
    fn run(self, signals: &Receiver<Signal>) {
        tracing::trace!("icon worker started");
        let mut pending: Option<(u64, usize)> = None;

        loop {
            let signal = match pending.take() {
                Some((generation, index)) => select! {
                    recv(signals) -> signal => match signal {
                        Ok(signal) => {
                            pending = Some((generation, index));
                            signal
                        }
                        Err(_) => return,
                    },
                    default(self.step_pause) => Signal::Next { generation, index },
                },
                None => match signals.recv() {
                    Ok(signal) => signal,
                    Err(_) => return,
                },
            };

            match signal {
                Signal::Start { generation } => {
                    tracing::trace!("icon scan start, generation {generation}");
                    {
                        let mut progress = self.progress.lock();
                        progress.queued_starts = progress.queued_starts.saturating_sub(1);
                        progress.state = ScanState::Scanning {
                            generation,
                            next: 0,
                        };
                    }
                    pending = Some((generation, 0));
                }
                Signal::Next { generation, index } => {
                    pending = self.step(generation, index);
                }
                Signal::Interrupt { ack } => {
                    if pending.take().is_some() || self.progress.lock().state.is_scanning() {
                        tracing::trace!("icon scan interrupted");
                        self.set_state(ScanState::Interrupted);
                    }
                    let _ = ack.send(());
                }
                Signal::Exit => {
                    tracing::trace!("icon worker exiting");
                    return;
                }
            }
        }
    }

    /// Resolves the first unresolved row at or after `index`.
    ///
    /// Returns where to continue, or `None` when the pass is over. The result
    /// is stored on the row with the same path, wherever a re-sort moved it.
    fn step(&self, generation: u64, index: usize) -> Option<(u64, usize)> {
        let (target, path, is_folder) = {
            let set = self.entries.lock();
            if set.generation != generation {
                drop(set);
                tracing::trace!("dropping stale scan step for generation {generation}");
                self.set_state(ScanState::Idle);
                return None;
            }
            let skip_parent = set
                .entries
                .first()
                .is_some_and(ListEntry::is_parent_pseudo_entry);
            let start = if skip_parent { index.max(1) } else { index };
            let found = set
                .entries
                .iter()
                .enumerate()
                .skip(start)
                .find(|(_, e)| !e.is_resolved())
                .map(|(i, e)| (i, e.path().to_path_buf(), e.is_folder()));
            match found {
                Some(found) => found,
                None => {
                    drop(set);
                    self.finish(generation);
                    return None;
                }
            }
        };

        self.set_state(ScanState::Scanning {
            generation,
            next: target,
        });
        let result = resolve_with_timeout(&self.resolver, &path, is_folder, self.resolve_timeout);

        {
            let mut set = self.entries.lock();
            if set.generation != generation {
                drop(set);
                tracing::trace!(
                    "discarding icon for {} from a replaced collection",
                    path.display()
                );
                self.set_state(ScanState::Idle);
                return None;
            }
            let index = match set.entries.get(target) {
                Some(entry) if entry.path() == path => Some(target),
                _ => set.entries.iter().position(|e| e.path() == path),
            };
            let Some(index) = index else {
                return Some((generation, target + 1));
            };
            let entry = &mut set.entries[index];
            if entry.is_resolved() {
                return Some((generation, target + 1));
            }
            match result {
                Ok(icons) => entry.apply_icons(icons),
                Err(err) => {
                    tracing::debug!("{err}; keeping placeholder");
                    entry.mark_unresolvable();
                }
            }
            // Sent under the lock so the index matches the current order.
            let _ = self
                .updates
                .send(ListUpdate::RowResolved { generation, index });
        }

        Some((generation, target + 1))
    }

    fn finish(&self, generation: u64) {
        tracing::debug!("icon scan finished, generation {generation}");
        self.set_state(ScanState::Idle);
        let _ = self.updates.send(ListUpdate::ScanFinished { generation });
    }

    /// Records worker progress unless a newer pass is already queued.
    fn set_state(&self, state: ScanState) {
        let mut progress = self.progress.lock();
        if progress.queued_starts == 0 {
            progress.state = state;
        }
    }
}
