//! Database models.

pub mod menu;
pub mod menu_link;
pub mod repository;

pub use menu::Menu;
pub use menu_link::MenuLinkContent;
pub use repository::{MenuRepository, PgMenuRepository};
