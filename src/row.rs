use std::borrow::Cow;
use std::fmt;

use crate::error::PrepareError;
use crate::{EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE};

pub type RowBytes = [u8; ROW_SIZE];

/// One fixed-width record. Text fields are zero padded to their column width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    username: [u8; USERNAME_SIZE],
    email: [u8; EMAIL_SIZE],
}

impl Row {
    /// Builds a row, cutting `username` and `email` down to their column
    /// widths if they don't fit.
    pub fn new(id: u32, username: &str, email: &str) -> Self {
        Self {
            id,
            username: fixed_width(username),
            email: fixed_width(email),
        }
    }

    /// Like [`Row::new`], but refuses oversized fields instead of truncating.
    pub fn build(id: u32, username: &str, email: &str) -> Result<Self, PrepareError> {
        if username.len() > USERNAME_SIZE || email.len() > EMAIL_SIZE {
            return Err(PrepareError::StringTooLong);
        }
        Ok(Self::new(id, username, email))
    }

    pub fn username(&self) -> Cow<'_, str> {
        field_text(&self.username)
    }

    pub fn email(&self) -> Cow<'_, str> {
        field_text(&self.email)
    }

    pub fn serialize(&self) -> RowBytes {
        let mut buf = [0u8; ROW_SIZE];
        self.serialize_into(&mut buf);
        buf
    }

    /// Writes the row into the first `ROW_SIZE` bytes of `buf`.
    pub fn serialize_into(&self, buf: &mut [u8]) {
        buf[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_be_bytes());
        buf[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE].copy_from_slice(&self.email);
        buf[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE].copy_from_slice(&self.username);
    }

    /// Reads a row back from the first `ROW_SIZE` bytes of `buf`.
    pub fn deserialize(buf: &[u8]) -> Self {
        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&buf[ID_OFFSET..ID_OFFSET + ID_SIZE]);
        let mut email = [0u8; EMAIL_SIZE];
        email.copy_from_slice(&buf[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]);
        let mut username = [0u8; USERNAME_SIZE];
        username.copy_from_slice(&buf[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]);
        Self {
            id: u32::from_be_bytes(id),
            username,
            email,
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username(), self.email())
    }
}

fn fixed_width<const N: usize>(input: &str) -> [u8; N] {
    let mut buffer = [0u8; N];
    // Never split a multi-byte character.
    let mut len = input.len().min(N);
    while !input.is_char_boundary(len) {
        len -= 1;
    }
    buffer[..len].copy_from_slice(&input.as_bytes()[..len]);
    buffer
}

fn field_text(field: &[u8]) -> Cow<'_, str> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end])
}
