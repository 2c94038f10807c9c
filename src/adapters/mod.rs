pub mod lock;

pub use lock::file::FileLockManager;
pub use lock::{LockGuard, LockManager};
