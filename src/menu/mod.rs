//! Menu building blocks: localized captions, option actions, dynamic
//! menus and the item catalog loaded from the menu definition file.

pub mod caption;
pub mod catalog;
pub mod model;

pub use caption::Caption;
pub use catalog::{ItemCatalog, ItemDef, StaticOption};
pub use model::{Action, DynamicMenu, MenuOption, Step};
