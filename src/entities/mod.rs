//! Entity module - Contains all SeaORM entity definitions for the ledger.
//! These entities represent the database tables and their relationships.
//! Relations carry the restrict/cascade delete policy, so the generated schema enforces it.

pub mod account;
pub mod category;
pub mod sheet;
pub mod sheet_entry;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use sheet::{Column as SheetColumn, Entity as Sheet, Model as SheetModel};
pub use sheet_entry::{
    Column as SheetEntryColumn, Entity as SheetEntry, Model as SheetEntryModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
