//! Requests completed off the event-loop thread.
//!
//! A [`Pending`] runs a backend call on a worker thread. The event loop keeps
//! going and calls [`Pending::poll`] each tick; the continuation runs on the
//! event-loop thread once a result shows up. There is no cancellation and no
//! timeout: a request that never answers simply stays pending.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::{Error, Result};

/// A backend call whose result has not been consumed yet.
#[derive(Debug)]
pub struct Pending<T> {
    label: &'static str,
    receiver: Receiver<Result<T>>,
    finished: bool,
}

impl<T: Send + 'static> Pending<T> {
    /// Run `request` on a worker thread.
    pub fn spawn<F>(label: &'static str, request: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // The receiver may be gone if the caller dropped the request
            let _ = sender.send(request());
        });
        log::debug!("⏳ Request '{}' in flight", label);
        Self {
            label,
            receiver,
            finished: false,
        }
    }

    /// A request that has already completed.
    pub fn ready(label: &'static str, result: Result<T>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(result);
        Self {
            label,
            receiver,
            finished: false,
        }
    }

    /// Take the result if it has arrived. Yields `Some` at most once.
    pub fn poll(&mut self) -> Option<Result<T>> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.finished = true;
                log::debug!("✅ Request '{}' completed", self.label);
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                log::error!("Request '{}' worker terminated without a result", self.label);
                Some(Err(Error::backend(0, "request worker terminated")))
            }
        }
    }

    /// Block until the result arrives.
    pub fn wait(mut self) -> Result<T> {
        if self.finished {
            return Err(Error::backend(0, "result already consumed"));
        }
        self.finished = true;
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(Error::backend(0, "request worker terminated")))
    }

    /// Whether the result has been consumed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Label given at creation.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Busy flag that keeps two requests of the same kind from overlapping.
///
/// Callers disable the matching UI control while [`RequestGate::is_busy`].
#[derive(Debug, Default)]
pub struct RequestGate {
    busy: bool,
}

impl RequestGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a request as started; fails if one is already running.
    pub fn begin(&mut self) -> Result<()> {
        if self.busy {
            return Err(Error::Busy);
        }
        self.busy = true;
        Ok(())
    }

    /// Mark the running request as done.
    pub fn finish(&mut self) {
        self.busy = false;
    }

    /// Whether a request is running.
    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_request_completes() {
        let pending = Pending::spawn("sum", || Ok(2 + 2));
        assert_eq!(pending.wait().unwrap(), 4);
    }

    #[test]
    fn test_poll_yields_once() {
        let mut pending = Pending::ready("ready", Ok("done"));
        assert_eq!(pending.poll().unwrap().unwrap(), "done");
        assert!(pending.is_finished());
        assert!(pending.poll().is_none());
    }

    #[test]
    fn test_poll_until_done() {
        let (tx, rx) = mpsc::channel::<()>();
        let mut pending = Pending::spawn("gated", move || {
            rx.recv().map_err(|_| Error::backend(0, "gate closed"))?;
            Ok(7)
        });

        assert!(pending.poll().is_none());
        tx.send(()).unwrap();

        let result = loop {
            if let Some(result) = pending.poll() {
                break result;
            }
            thread::yield_now();
        };
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_error_result_passes_through() {
        let pending: Pending<u32> = Pending::ready("fail", Err(Error::backend(502, "bad gateway")));
        let err = pending.wait().unwrap_err();
        assert!(matches!(err, Error::Backend { status: 502, .. }));
    }

    #[test]
    fn test_gate_rejects_overlap() {
        let mut gate = RequestGate::new();
        gate.begin().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.begin(), Err(Error::Busy)));
        gate.finish();
        assert!(gate.begin().is_ok());
    }
}
