use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::error::{DbError, Result};
use crate::{PAGE_SIZE, TABLE_MAX_PAGES};

pub type Page = [u8; PAGE_SIZE];

/// Owns the database file and caches its pages in memory.
///
/// Pages are read lazily on first access and stay cached until the pager is
/// dropped. Nothing is written back until [`Pager::flush`] is called.
pub struct Pager {
    file: File,
    file_length: u64,
    pages: Vec<Option<Box<Page>>>,
}

impl Pager {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Self::from_file(file)
    }

    /// Wraps an already open handle. Flushes fail if it isn't writable.
    pub fn from_file(file: File) -> Result<Self> {
        let file_length = file.metadata()?.len();

        Ok(Self {
            file,
            file_length,
            pages: (0..TABLE_MAX_PAGES).map(|_| None).collect(),
        })
    }

    pub fn file_length(&self) -> u64 {
        self.file_length
    }

    pub fn is_cached(&self, page_num: usize) -> bool {
        matches!(self.pages.get(page_num), Some(Some(_)))
    }

    pub fn get_page(&mut self, page_num: usize) -> Result<&mut Page> {
        if page_num >= TABLE_MAX_PAGES {
            return Err(DbError::PageOutOfBounds(page_num));
        }

        if self.pages[page_num].is_none() {
            let page = self.load_page(page_num)?;
            self.pages[page_num] = Some(page);
        }

        self.pages[page_num]
            .as_deref_mut()
            .ok_or(DbError::PageNotCached(page_num))
    }

    /// Writes the first `size` bytes of a cached page back to its place in
    /// the file.
    pub fn flush(&mut self, page_num: usize, size: usize) -> Result<()> {
        let page = self
            .pages
            .get(page_num)
            .and_then(Option::as_deref)
            .ok_or(DbError::PageNotCached(page_num))?;
        let size = size.min(PAGE_SIZE);
        let offset = (page_num * PAGE_SIZE) as u64;

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&page[..size])?;
        self.file_length = self.file_length.max(offset + size as u64);

        debug!("flushed {size} bytes of page {page_num}");
        Ok(())
    }

    /// Syncs the file and releases the handle.
    pub fn close(self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn load_page(&mut self, page_num: usize) -> Result<Box<Page>> {
        let mut page = Box::new([0u8; PAGE_SIZE]);
        let offset = (page_num * PAGE_SIZE) as u64;

        // Pages past the end of the file start out zeroed.
        if offset < self.file_length {
            self.file.seek(SeekFrom::Start(offset))?;
            let read = read_up_to(&mut self.file, &mut page[..])?;
            debug!("loaded page {page_num} ({read} bytes from file)");
        } else {
            debug!("allocated page {page_num}");
        }

        Ok(page)
    }
}

/// Fills `buf` from `reader` until it is full or the reader hits EOF.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
