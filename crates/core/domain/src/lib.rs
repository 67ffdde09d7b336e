pub mod data;
pub mod identity;

pub use data::DiscussionItem;
pub use identity::{NumericId, ViewerIdentity};
