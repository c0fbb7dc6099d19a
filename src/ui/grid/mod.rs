// src/ui/grid/mod.rs
pub mod filter;
pub mod scroll_sync;
pub mod view;
pub mod widths;
