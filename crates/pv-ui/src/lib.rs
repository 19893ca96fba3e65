//! User interface chrome for the places viewer
//!
//! This crate provides the application theme and the shell pieces that
//! frame the views: heading panel, loading screen and error screen.

pub mod shell;
pub mod theme;

pub use shell::{error_screen, heading_panel, loading_screen};
pub use theme::{apply_theme, Theme};
