/// Reactive state core
///
/// Holds the current view-relevant state behind a single-writer container,
/// derives the UI-facing projection, and queues one-shot effects for a UI
/// collaborator to drain.

pub mod container;
pub mod effect;
pub mod view;

pub use container::*;
pub use effect::*;
pub use view::*;
