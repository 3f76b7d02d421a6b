use std::path::Path;

use log::{info, warn};

use crate::error::{DbError, Result};
use crate::pager::Pager;
use crate::row::Row;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_ROWS};

/// A single append-only table of fixed-width rows.
pub struct Table {
    row_count: u32,
    pager: Pager,
}

impl Table {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pager = Pager::open(path)?;
        let row_count = rows_in_file(pager.file_length());

        info!("opened {} with {row_count} rows", path.display());
        Ok(Self { row_count, pager })
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Maps a row number to its page and the byte offset inside that page.
    pub fn row_slot(row_num: u32) -> (usize, usize) {
        let row_num = row_num as usize;
        let page_num = row_num / ROWS_PER_PAGE;
        let byte_offset = (row_num % ROWS_PER_PAGE) * ROW_SIZE;
        (page_num, byte_offset)
    }

    pub fn insert(&mut self, id: u32, username: &str, email: &str) -> Result<()> {
        self.insert_row(&Row::new(id, username, email))
    }

    /// Appends `row` after the last row in the table.
    pub fn insert_row(&mut self, row: &Row) -> Result<()> {
        if self.row_count as usize >= TABLE_MAX_ROWS {
            warn!("insert rejected, table holds {} rows", self.row_count);
            return Err(DbError::TableFull);
        }

        let (page_num, offset) = Self::row_slot(self.row_count);
        let page = self.pager.get_page(page_num)?;
        row.serialize_into(&mut page[offset..offset + ROW_SIZE]);
        self.row_count += 1;
        Ok(())
    }

    pub fn read(&mut self, row_num: u32) -> Result<Row> {
        if row_num >= self.row_count {
            return Err(DbError::RowNotFound(row_num));
        }

        let (page_num, offset) = Self::row_slot(row_num);
        let page = self.pager.get_page(page_num)?;
        Ok(Row::deserialize(&page[offset..offset + ROW_SIZE]))
    }

    /// Writes every cached page back to disk and closes the file.
    ///
    /// All flushes are attempted even if one fails; the first error wins.
    pub fn close(mut self) -> Result<()> {
        let row_count = self.row_count as usize;
        let full_pages = row_count / ROWS_PER_PAGE;
        let mut result = Ok(());

        for page_num in 0..full_pages {
            if self.pager.is_cached(page_num) {
                result = result.and(self.pager.flush(page_num, PAGE_SIZE));
            }
        }

        let additional_rows = row_count % ROWS_PER_PAGE;
        if additional_rows > 0 && self.pager.is_cached(full_pages) {
            result = result.and(self.pager.flush(full_pages, additional_rows * ROW_SIZE));
        }

        result = result.and(self.pager.close());
        info!("closed table with {row_count} rows");
        result
    }
}

/// Counts the complete rows stored in a file of `file_length` bytes. Full
/// pages carry unused padding after their last row, so the count is taken
/// page by page rather than as a straight division.
fn rows_in_file(file_length: u64) -> u32 {
    let file_length = file_length as usize;
    let full_pages = file_length / PAGE_SIZE;
    let trailing_rows = ((file_length % PAGE_SIZE) / ROW_SIZE).min(ROWS_PER_PAGE);
    let rows = (full_pages * ROWS_PER_PAGE + trailing_rows).min(TABLE_MAX_ROWS);
    rows as u32
}
