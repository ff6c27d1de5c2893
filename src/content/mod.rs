//! Content sources: the working set / persistence boundary, external
//! read-only libraries, and the cached multi-source index over both.

pub mod file_store;
pub mod index;
pub mod store;

pub use file_store::{load_libraries, FileLibrary, FileStore};
pub use index::{ContentIndex, FoundItem, ItemSource};
pub use store::{
    ActorHandle, ContentLibrary, ContentStore, LibraryEntry, LibraryError, StoreError, WorldItem,
};
