//! Menu link tree loading and manipulation.
//!
//! [`MenuLinkTree`] assembles the parent/child structure of a menu's links
//! and runs it through an ordered manipulator pipeline (node filtering,
//! weight sort). Formats consume only the final filtered, sorted tree.

mod plugin_id;
mod tree;

pub use plugin_id::{LinkPluginId, PluginIdError};
pub use tree::{
    DEFAULT_MANIPULATORS, MenuLinkNode, MenuLinkTree, MenuTreeElement, RouteDescriptor,
    TreeManipulator,
};
