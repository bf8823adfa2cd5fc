//! Inventory backend: materials, products, and product compositions over REST.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod routes;
pub mod service;
pub mod state;

pub use client::{ApiClient, ClientError};
pub use config::Settings;
pub use error::AppError;
pub use migration::{apply_migrations, ensure_database_exists};
pub use model::{CompositionLine, Material, MaterialLine, Product, ProductDetail};
pub use routes::app;
pub use service::{MaterialService, ProductService};
pub use state::AppState;
