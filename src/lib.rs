//! Billing Engine Library
//!
//! Derived-value computation for billing documents: formula-driven custom
//! fields resolved in dependency order, per-line tax breakdowns and
//! document totals with round-off.

use actix_web::web;

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::formulas;
pub use modules::invoices;
pub use modules::taxes;

/// Register every HTTP route of the service
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::health::controllers::configure)
        .configure(modules::formulas::controllers::configure)
        .configure(modules::taxes::controllers::configure)
        .configure(modules::invoices::controllers::configure);
}
