pub mod formulas;
pub mod health;
pub mod invoices;
pub mod taxes;
