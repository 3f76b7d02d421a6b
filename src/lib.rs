pub mod error;
pub mod pager;
pub mod repl;
pub mod row;
pub mod table;

pub use error::{DbError, PrepareError, Result};
pub use pager::{Page, Pager};
pub use row::Row;
pub use table::Table;

pub const COLUMN_USERNAME_SIZE: usize = 32;
pub const COLUMN_EMAIL_SIZE: usize = 255;
pub const ID_SIZE: usize = size_of::<u32>();
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE;

// On-disk field order is id, email, username.
pub const ID_OFFSET: usize = 0;
pub const EMAIL_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const USERNAME_OFFSET: usize = EMAIL_OFFSET + EMAIL_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

pub const PAGE_SIZE: usize = 4096;
pub const TABLE_MAX_PAGES: usize = 100;
pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;
pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;
