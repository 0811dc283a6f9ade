//! This file serves as the root for all SeaORM entity modules.
//! The chart of accounts is made of two tables: account types and the
//! self-referencing accounts tree.

pub mod account;
pub mod account_type;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::account_type::Entity as AccountType;
}
