pub mod label_panel;
pub mod theme;
pub mod toolbar;
pub mod viewer;
