// src/invoice/mod.rs
pub mod definitions;
pub mod engine;
pub mod events;
pub mod loader;
pub mod plugin;
pub mod resources;
pub mod review;
pub mod systems;
