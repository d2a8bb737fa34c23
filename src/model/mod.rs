pub mod date;
pub mod item;
pub mod store;
pub mod timeline;

pub use item::{item_tooltip, Item, ItemId, ItemPatch, ItemUpdate, Scheduled};
pub use store::ItemStore;
pub use timeline::{ItemPosition, MonthMarker, Viewport, VisibleRange};
