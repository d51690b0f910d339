// Public library interface for treelens
// Shared by the window and terminal viewers

pub mod config;
pub mod distribution;
pub mod egui_surface;
pub mod error;
pub mod fs;
pub mod layout;
pub mod surface;
pub mod terminal_surface;
pub mod tree;
pub mod view;
pub mod weight;
