// src/ui/panels/mod.rs
pub mod log_tab;
pub mod main_view;
pub mod operations_tab;
pub mod settings_tab;
