use crate::error::{MsgDepsError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Flags shared with the Ctrl-C handler. Phase boundaries consult them;
/// an in-flight generator invocation is never interrupted.
#[derive(Default)]
struct ShutdownState {
    stop_requested: AtomicBool,
    notice_printed: AtomicBool,
}

pub struct GracefulShutdown {
    state: Arc<ShutdownState>,
}

impl GracefulShutdown {
    pub fn new() -> Result<Self> {
        let state = Arc::new(ShutdownState::default());

        let handler_state = Arc::clone(&state);
        ctrlc::set_handler(move || {
            handler_state.stop_requested.store(true, Ordering::SeqCst);

            // First Ctrl-C asks politely, the second one forces the issue.
            if handler_state.notice_printed.swap(true, Ordering::SeqCst) {
                eprintln!("\n💀 Force stopping...");
                std::process::exit(1);
            }
            eprintln!("\n🛑 Gracefully stopping... (press Ctrl+C again to force exit)");
        })
        .map_err(|e| MsgDepsError::Config {
            message: format!("Failed to install Ctrl-C handler: {}", e),
        })?;

        Ok(Self { state })
    }

    /// Handler-free constructor: the process-global Ctrl-C hook can only
    /// be installed once, which test binaries must avoid.
    pub fn new_for_test() -> Self {
        Self {
            state: Arc::new(ShutdownState::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.state.stop_requested.load(Ordering::SeqCst)
    }

    pub fn check_shutdown(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(MsgDepsError::Cancelled)
        }
    }

    pub fn request_shutdown(&self) {
        self.state.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.state.stop_requested.store(false, Ordering::SeqCst);
        self.state.notice_printed.store(false, Ordering::SeqCst);
    }
}

impl Default for GracefulShutdown {
    fn default() -> Self {
        // Registration fails when a handler is already installed; fall
        // back to a flag nobody flips.
        Self::new().unwrap_or_else(|_| Self::new_for_test())
    }
}
