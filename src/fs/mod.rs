pub mod atomic;
pub mod file;
pub mod mkstemp;
pub mod ops;
pub mod stream;

pub use atomic::{commit_rename, fsync_file, open_dir, CommitOutcome};
pub use file::FsFile;
pub use mkstemp::create_unique_from_template;
pub use ops::{access_exists, fstat_size, open_read_only, path_exists, read_sized, realpath, remove_file};
pub use stream::{ReadStream, WriteStream};
