//! User-visible status messages
//!
//! The UI is reached only through [`StatusDispatch`]. [`Notifier`] shows a
//! message and clears it after a delay; showing a new message cancels the
//! pending clear of the previous one.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Actions the UI understands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusAction {
    /// Show a status message
    SetMessage(String),
    /// Hide the status message
    ClearMessage,
    /// Show the busy indicator
    SetProcessing,
    /// Hide the busy indicator
    ClearProcessing,
    /// Forget the selected file
    ClearFile,
}

/// UI callback receiving status actions
pub trait StatusDispatch: Send + Sync + Debug {
    /// Apply an action
    fn dispatch(&self, action: StatusAction);
}

/// Timed status messages over a [`StatusDispatch`]
#[derive(Debug)]
pub struct Notifier {
    dispatch: Arc<dyn StatusDispatch>,
    pending_clear: Mutex<Option<JoinHandle<()>>>,
}

impl Notifier {
    /// Notify through `dispatch`
    #[must_use]
    pub fn new(dispatch: Arc<dyn StatusDispatch>) -> Self {
        Self {
            dispatch,
            pending_clear: Mutex::new(None),
        }
    }

    /// Show `message` and clear it after `duration_secs`
    ///
    /// Must be called within a Tokio runtime.
    pub fn run(&self, message: impl Into<String>, duration_secs: u64) {
        let message = message.into();
        tracing::debug!(%message, duration_secs, "status message");
        self.dispatch.dispatch(StatusAction::SetMessage(message));

        let dispatch = Arc::clone(&self.dispatch);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(duration_secs)).await;
            dispatch.dispatch(StatusAction::ClearMessage);
        });
        if let Some(previous) = self.pending_clear.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Send an action straight to the UI
    pub fn dispatch(&self, action: StatusAction) {
        self.dispatch.dispatch(action);
    }

    /// Drop the pending clear, leaving the current message up
    pub fn cancel_pending(&self) {
        if let Some(previous) = self.pending_clear.lock().take() {
            previous.abort();
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(previous) = self.pending_clear.get_mut().take() {
            previous.abort();
        }
    }
}
