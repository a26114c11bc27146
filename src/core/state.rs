//! Process-wide run state.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

// =============================================================================
// SHUTDOWN state
// =============================================================================

/// Setup the global Ctrl+C handler. Call once at program start
///
/// - First Ctrl+C: sets the SHUTDOWN flag; the batch stops starting new
///   files and lets in-flight files finish
/// - Second Ctrl+C: exits immediately
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        crate::log!("normalize"; "stopping after files in progress (Ctrl+C again to abort)");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Check if shutdown has been requested
///
/// Relaxed: a worker may start one more file before it sees the flag
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
