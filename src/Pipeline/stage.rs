use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How long [`StageThread`]'s destructor waits for the stage to stop.
pub const DEFAULT_FINISH_TIMEOUT: Duration = Duration::from_secs(5);

const FINISH_POLL: Duration = Duration::from_millis(1);

/// One step of pipeline work, run repeatedly on a [`StageThread`].
pub trait Stage: Send + 'static {
    /// Run one step. Returning `true` ends the loop.
    fn on_exec(&mut self) -> bool;
}

impl<F> Stage for F
where
    F: FnMut() -> bool + Send + 'static,
{
    fn on_exec(&mut self) -> bool {
        self()
    }
}

/// Named worker thread driving a [`Stage`] until it reports done or exit is
/// requested.
///
/// Dropping a running stage thread requests exit and waits up to
/// [`DEFAULT_FINISH_TIMEOUT`].
pub struct StageThread {
    name: String,
    exit: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StageThread {
    pub fn spawn<S: Stage>(name: impl Into<String>, mut stage: S) -> io::Result<Self> {
        let name = name.into();
        let exit = Arc::new(AtomicBool::new(false));

        let stop = Arc::clone(&exit);
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            while !stop.load(Ordering::Acquire) {
                if stage.on_exec() {
                    break;
                }
            }
        })?;

        tracing::info!(stage = %name, "stage thread started");
        Ok(Self {
            name,
            exit,
            handle: Some(handle),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the loop to stop after the current step.
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Release);
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }

    /// Whether the loop has stopped (or the thread was already joined).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Request exit and wait up to `timeout` for the thread to stop.
    ///
    /// Returns `true` on a normal exit. On timeout the thread keeps running
    /// and a later call may still join it; a panicked stage counts as a bad
    /// exit.
    pub fn finish(&mut self, timeout: Duration) -> bool {
        self.request_exit();

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                tracing::error!(stage = %self.name, ?timeout, "stage thread bad exit: timed out");
                self.handle = Some(handle);
                return false;
            }
            thread::sleep(FINISH_POLL);
        }

        match handle.join() {
            Ok(()) => {
                tracing::info!(stage = %self.name, "stage thread normal exit");
                true
            }
            Err(_) => {
                tracing::error!(stage = %self.name, "stage thread bad exit: panicked");
                false
            }
        }
    }
}

impl Drop for StageThread {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.finish(DEFAULT_FINISH_TIMEOUT);
        }
    }
}

impl std::fmt::Debug for StageThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageThread")
            .field("name", &self.name)
            .field("exit_requested", &self.exit_requested())
            .field("finished", &self.is_finished())
            .finish()
    }
}
