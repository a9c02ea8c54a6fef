//! Message feed
//!
//! A background thread appends status messages to a shared, bounded log at a
//! fixed interval. The frame loop reads the most recent lines to display.

use std::collections::VecDeque;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

/// Lines kept by default
pub const MESSAGE_LOG_CAPACITY: usize = 64;

/// Bounded, thread-safe message log. Oldest lines drop first.
#[derive(Debug, Clone)]
pub struct MessageLog {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::with_capacity(MESSAGE_LOG_CAPACITY)
    }
}

impl MessageLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    // Recover from poisoning
    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, message: impl Into<String>) {
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(message.into());
    }

    /// Up to `n` newest lines, oldest first
    pub fn recent(&self, n: usize) -> Vec<String> {
        let lines = self.lock();
        lines.iter().skip(lines.len().saturating_sub(n)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Background producer writing one message per interval into a `MessageLog`
#[derive(Debug)]
pub struct MessageFeed {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MessageFeed {
    /// Start the feed. `next` gets the running message count.
    pub fn spawn<F>(messages: MessageLog, interval: Duration, mut next: F) -> Self
    where
        F: FnMut(u64) -> String + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            let mut count = 0u64;
            loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        messages.push(next(count));
                        count += 1;
                    }
                    // Explicit stop or the owner went away
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::debug!("message feed stopped after {} messages", count);
        });
        log::info!("message feed started, one message every {:?}", interval);

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to finish
    pub fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            // Already gone if the thread exited on its own
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("message feed thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for MessageFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}
