//! Streaming SQL statement reader.

use std::io::{BufRead, BufReader, Read};

pub const SMALL_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Unknown,
    CreateTable,
    CreateView,
    CreateIndex,
    AlterTable,
    Insert,
}

impl StatementType {
    /// Whether the statement contributes to the catalog
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            StatementType::CreateTable
                | StatementType::CreateView
                | StatementType::CreateIndex
                | StatementType::AlterTable
        )
    }
}

pub struct Parser<R: Read> {
    reader: BufReader<R>,
    stmt_buffer: Vec<u8>,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R, buffer_size: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(buffer_size, reader),
            stmt_buffer: Vec::with_capacity(32 * 1024),
        }
    }

    /// Read up to and including the next `;` outside quotes, `--` and `/* */` comments.
    ///
    /// Returns the trailing fragment without a terminator at end of input,
    /// and `None` once the input is exhausted.
    pub fn read_statement(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        self.stmt_buffer.clear();

        let mut inside_single_quote = false;
        let mut inside_double_quote = false;
        let mut inside_line_comment = false;
        let mut inside_block_comment = false;
        let mut escaped = false;
        let mut prev: u8 = 0;

        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                if is_blank(&self.stmt_buffer) {
                    self.stmt_buffer.clear();
                    return Ok(None);
                }
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            let mut consumed = 0;
            let mut found_terminator = false;

            for (i, &b) in buf.iter().enumerate() {
                if inside_line_comment {
                    if b == b'\n' {
                        inside_line_comment = false;
                    }
                    prev = b;
                    continue;
                }

                if inside_block_comment {
                    if b == b'/' && prev == b'*' {
                        inside_block_comment = false;
                        prev = 0;
                    } else {
                        prev = b;
                    }
                    continue;
                }

                let inside_string = inside_single_quote || inside_double_quote;

                if escaped {
                    escaped = false;
                    prev = b;
                    continue;
                }

                if b == b'\\' && inside_string {
                    escaped = true;
                    prev = b;
                    continue;
                }

                if b == b'-' && prev == b'-' && !inside_string {
                    inside_line_comment = true;
                } else if b == b'*' && prev == b'/' && !inside_string {
                    inside_block_comment = true;
                    prev = 0;
                    continue;
                } else if b == b'\'' && !inside_double_quote {
                    inside_single_quote = !inside_single_quote;
                } else if b == b'"' && !inside_single_quote {
                    inside_double_quote = !inside_double_quote;
                } else if b == b';' && !inside_string {
                    self.stmt_buffer.extend_from_slice(&buf[..=i]);
                    consumed = i + 1;
                    found_terminator = true;
                    break;
                }
                prev = b;
            }

            if found_terminator {
                self.reader.consume(consumed);
                let result = std::mem::take(&mut self.stmt_buffer);
                return Ok(Some(result));
            }

            self.stmt_buffer.extend_from_slice(buf);
            let len = buf.len();
            self.reader.consume(len);
        }
    }
}

/// Classify a statement by its leading keywords
pub fn statement_type(stmt: &[u8]) -> StatementType {
    let stmt = strip_leading_comments(stmt);

    let upper_prefix: Vec<u8> = stmt
        .iter()
        .take(48)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    let words: Vec<&[u8]> = upper_prefix
        .split(|b| is_whitespace(*b))
        .filter(|w| !w.is_empty())
        .collect();

    match words.as_slice() {
        [b"CREATE", rest @ ..] => {
            let rest: Vec<&[u8]> = rest
                .iter()
                .copied()
                .filter(|w| {
                    !matches!(
                        *w,
                        b"TEMP" | b"TEMPORARY" | b"UNIQUE" | b"CLUSTERED" | b"NONCLUSTERED"
                    )
                })
                .collect();
            match rest.first() {
                Some(w) if w.starts_with(b"TABLE") => StatementType::CreateTable,
                Some(w) if w.starts_with(b"VIEW") => StatementType::CreateView,
                Some(w) if w.starts_with(b"INDEX") => StatementType::CreateIndex,
                _ => StatementType::Unknown,
            }
        }
        [b"ALTER", w, ..] if w.starts_with(b"TABLE") => StatementType::AlterTable,
        [b"INSERT", ..] => StatementType::Insert,
        _ => StatementType::Unknown,
    }
}

fn strip_leading_comments(mut data: &[u8]) -> &[u8] {
    loop {
        data = trim_ascii_start(data);
        if data.starts_with(b"--") {
            match data.iter().position(|&b| b == b'\n') {
                Some(end) => data = &data[end + 1..],
                None => return &[],
            }
        } else if data.starts_with(b"/*") {
            match data[2..].windows(2).position(|w| w == b"*/") {
                Some(end) => data = &data[end + 4..],
                None => return &[],
            }
        } else {
            return data;
        }
    }
}

#[inline]
fn trim_ascii_start(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|&b| !is_whitespace(b))
        .unwrap_or(data.len());
    &data[start..]
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_blank(data: &[u8]) -> bool {
    strip_leading_comments(data).is_empty()
}
