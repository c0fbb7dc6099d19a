// src/ui/popups/mod.rs
pub mod barcode_popup;
pub mod name_popup;
pub mod price_popup;

pub use barcode_popup::show_barcode_popup;
pub use name_popup::show_name_popup;
pub use price_popup::show_price_popup;
