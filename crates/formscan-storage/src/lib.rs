//! formscan-storage: the host-side collaborators.
//!
//! - `SiteDatabase`: a WordPress-schema SQLite connection with a table prefix
//! - `WordPressSource`: published posts, their postmeta, filtered and rendered content
//! - `InMemoryDocumentSource`: documents already held by the caller
//! - `SqliteFormStore` + `StoredStatusResolver`: form status classification

pub mod connection;
pub mod forms;
pub mod memory;
pub mod schema;
pub mod wordpress;

pub use connection::SiteDatabase;
pub use forms::{SqliteFormStore, StoredStatusResolver};
pub use memory::InMemoryDocumentSource;
pub use wordpress::{ContentRenderer, WordPressSource};
