//! Presentation helpers: button construction and menu layouts.

pub mod buttons;
pub mod menus;
