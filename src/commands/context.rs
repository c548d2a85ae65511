use anyhow::Result;

use crate::LocsyncContext;
use crate::output;
use crate::tracking::scanner::TreeScanner;
use crate::tracking::state::SyncState;

/// Trait providing common operations for command modules
pub trait CommandContext {
    /// Ensures the source tree exists before executing a command
    ///
    /// # Errors
    ///
    /// Returns an error if the source root is not a directory
    fn ensure_source(&self) -> Result<()>;

    /// Eligible source files, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the source root cannot be walked
    fn source_files(&self) -> Result<Vec<String>>;

    /// Loads the sync state, starting fresh if it is missing or malformed
    fn load_sync_state(&self) -> SyncState;

    /// Saves the sync state, warning instead of failing
    ///
    /// Returns whether the state was written.
    fn save_sync_state(&self, state: &mut SyncState) -> bool;
}

impl CommandContext for LocsyncContext {
    fn ensure_source(&self) -> Result<()> {
        self.check_source_exists()
    }

    fn source_files(&self) -> Result<Vec<String>> {
        TreeScanner::new(&self.source_root, self.scan_options()).scan_files()
    }

    fn load_sync_state(&self) -> SyncState {
        SyncState::load(&self.state_path(), &self.stored_source_root())
    }

    fn save_sync_state(&self, state: &mut SyncState) -> bool {
        match state.save(&self.state_path()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "State not saved");
                output::warning(&e.user_message());
                false
            }
        }
    }
}
