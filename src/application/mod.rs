pub mod debounce;
pub mod download_coordinator;

pub use debounce::{DebounceTicket, Debouncer};
pub use download_coordinator::DownloadCoordinator;
