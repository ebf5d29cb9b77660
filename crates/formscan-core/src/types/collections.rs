//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;

/// SmallVec sized for form ids captured from one matcher (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
