//! Reusable widget components.

pub mod card;
pub mod detail;
pub mod field;
pub mod status;

pub use card::{CardWidget, SkeletonCard, SKELETON_TITLE};
pub use detail::DetailPanel;
pub use field::FormField;
pub use status::StatusIndicator;
