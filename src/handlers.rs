pub mod account_types;
pub mod accounts;
pub mod health;
