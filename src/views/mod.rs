//! Presentation layer.
//!
//! Pages are plain state machines rendered to text. They read session
//! events and lookup results; they never hold a camera or make requests on
//! their own.

pub mod app;
pub mod format;
pub mod product_card;
pub mod product_page;
pub mod route;
pub mod scanner_page;

pub use app::App;
pub use format::{format_amount_es_ar, format_price};
pub use product_card::ProductCard;
pub use product_page::{ProductPage, ProductView};
pub use route::Route;
pub use scanner_page::ScannerPage;
