mod dir_fs;
mod entry;
mod map_fs;

pub use dir_fs::{DirFS, TrashHandler};
pub use entry::{Entry, EntryType, PARENT_LINK};
pub use map_fs::{DEFAULT_HOME, MapFS};
