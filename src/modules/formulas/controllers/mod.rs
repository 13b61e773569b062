pub mod formula_controller;

pub use formula_controller::configure;
