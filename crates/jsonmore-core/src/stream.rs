//! Reading single JSON values from a byte stream.
//!
//! A stream may hold several JSON values back to back (a log of objects,
//! for instance). [`skip`] and [`read`] each take exactly one value off the
//! front of the stream and leave everything after it unread, so the next
//! call starts at the following value.
//!
//! Both are driven by the incremental [`Checker`]: bytes are inspected
//! through [`BufRead::fill_buf`] and consumed only once the checker accepts
//! them. A bare top-level number is terminated by the whitespace byte that
//! follows it, and that byte stays in the stream.
//!
//! # Example
//! ```
//! use jsonmore_core::stream;
//!
//! let mut input: &[u8] = br#"{"a":1} [2,3] "x""#;
//! let first = stream::read(&mut input).unwrap().unwrap();
//! assert_eq!(first["a"], 1);
//! assert_eq!(stream::skip(&mut input).unwrap(), Some(6)); // " [2,3]"
//! assert_eq!(input, br#" "x""#);
//! ```

use std::io::{self, BufRead};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checker::{Checker, Step, DEFAULT_MAX_DEPTH};
use crate::error::{JsonMoreError, Result};

/// Largest value [`read`] will buffer by default.
pub const DEFAULT_MAX_BYTES: usize = 500_000;

/// Bounds applied while reading a value from a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadLimits {
    /// Maximum size of a value accepted by [`read_with`], leading
    /// whitespace excluded. [`skip_with`] buffers nothing and ignores it.
    pub max_bytes: usize,
    /// Maximum container nesting accepted by the grammar check.
    pub max_depth: usize,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReadLimits {
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Consume one JSON value from `reader` without building a tree.
///
/// Whitespace before the value is not treated specially: it is consumed and
/// counted like any other accepted byte.
///
/// Returns `Ok(Some(n))` with the number of bytes consumed, or `Ok(None)`
/// when the stream was already at its end. Truncated or malformed input is
/// logged and returned as an error.
pub fn skip<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<usize>> {
    skip_with(reader, &ReadLimits::default())
}

/// [`skip`] with an explicit depth limit.
pub fn skip_with<R: BufRead + ?Sized>(
    reader: &mut R,
    limits: &ReadLimits,
) -> Result<Option<usize>> {
    let mut checker = Checker::new(limits.max_depth);
    let mut count = 0usize;

    loop {
        let byte = match peek_byte(reader) {
            Ok(Some(byte)) => byte,
            Ok(None) if count == 0 => return Ok(None),
            Ok(None) if checker.finish_at_eof() => return Ok(Some(count)),
            Ok(None) => {
                tracing::error!(read = count, "EOF after {count} bytes were read");
                return Err(JsonMoreError::Truncated { read: count });
            }
            Err(err) => {
                tracing::error!(read = count, "Reading error: {err}");
                return Err(err.into());
            }
        };

        match checker.push(byte) {
            Ok(Step::Continue) => {
                reader.consume(1);
                count += 1;
            }
            Ok(Step::Complete) => {
                reader.consume(1);
                return Ok(Some(count + 1));
            }
            Ok(Step::CompleteBefore) => return Ok(Some(count)),
            Err(source) => {
                reader.consume(1);
                tracing::error!(read = count, "Malformed JSON value: {source}");
                return Err(JsonMoreError::Malformed {
                    offset: count,
                    source,
                });
            }
        }
    }
}

/// Read one JSON value from `reader` using [`ReadLimits::default`].
pub fn read<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<Value>> {
    read_with(reader, &ReadLimits::default())
}

/// Read one JSON value from `reader` and parse it with `serde_json`.
///
/// Leading whitespace is discarded. The value's bytes are buffered (at most
/// `limits.max_bytes` of them) while the grammar check runs, then handed to
/// [`parse_slice`] once the value is complete. Bytes after the value are
/// left in the stream.
///
/// Returns `Ok(None)` if the stream ends before any non-whitespace byte.
pub fn read_with<R: BufRead + ?Sized>(
    reader: &mut R,
    limits: &ReadLimits,
) -> Result<Option<Value>> {
    let mut checker = Checker::new(limits.max_depth);
    let mut buf: Vec<u8> = Vec::new();

    loop {
        let byte = match peek_byte(reader) {
            Ok(Some(byte)) => byte,
            Ok(None) if buf.is_empty() => return Ok(None),
            Ok(None) if checker.finish_at_eof() => return parse_buffered(&buf).map(Some),
            Ok(None) => {
                tracing::error!(
                    read = buf.len(),
                    "EOF while {} bytes were read: '{}'",
                    buf.len(),
                    String::from_utf8_lossy(&buf)
                );
                return Err(JsonMoreError::Truncated { read: buf.len() });
            }
            Err(err) => {
                tracing::error!(read = buf.len(), "Reading error: {err}");
                return Err(err.into());
            }
        };

        if buf.is_empty() && byte.is_ascii_whitespace() {
            reader.consume(1);
            continue;
        }

        let step = match checker.push(byte) {
            Ok(step) => step,
            Err(source) => {
                reader.consume(1);
                buf.push(byte);
                tracing::error!(
                    read = buf.len(),
                    "Malformed JSON value: {source}\n'{}'",
                    String::from_utf8_lossy(&buf)
                );
                return Err(JsonMoreError::Malformed {
                    offset: buf.len() - 1,
                    source,
                });
            }
        };

        if step == Step::CompleteBefore {
            return parse_buffered(&buf).map(Some);
        }

        if buf.len() >= limits.max_bytes {
            tracing::error!(
                limit = limits.max_bytes,
                "Value is bigger than the read limit of {} bytes",
                limits.max_bytes
            );
            return Err(JsonMoreError::TooLarge {
                limit: limits.max_bytes,
            });
        }

        reader.consume(1);
        buf.push(byte);

        if step == Step::Complete {
            return parse_buffered(&buf).map(Some);
        }
    }
}

/// Consume ASCII whitespace up to the next significant byte or EOF.
/// Returns how many bytes were dropped.
///
/// Useful between [`skip`] calls, since `skip` counts whitespace as part of
/// the value and reports a stream that ends in whitespace as truncated.
pub fn skip_whitespace<R: BufRead + ?Sized>(reader: &mut R) -> Result<usize> {
    let mut count = 0;
    while let Some(byte) = peek_byte(reader)? {
        if !byte.is_ascii_whitespace() {
            break;
        }
        reader.consume(1);
        count += 1;
    }
    Ok(count)
}

/// Parse exactly `bytes` as one JSON value.
///
/// Nesting is capped by `serde_json`'s own recursion limit of 128 levels.
/// Values taken off a stream by [`read_with`] are bounded by
/// [`ReadLimits::max_depth`] instead.
pub fn parse_slice(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse bytes the [`Checker`] has already accepted, so their depth is
/// already bounded by `max_depth`.
fn parse_checked(bytes: &[u8]) -> Result<Value> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

fn parse_buffered(buf: &[u8]) -> Result<Value> {
    match parse_checked(buf) {
        Ok(value) => {
            tracing::debug!(bytes = buf.len(), "Read JSON value");
            Ok(value)
        }
        Err(err) => {
            tracing::error!(
                bytes = buf.len(),
                "Could not parse '{}': {err}",
                String::from_utf8_lossy(buf)
            );
            Err(err)
        }
    }
}

/// Look at the next byte without consuming it. `Ok(None)` means EOF.
fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Iterator over the concatenated JSON values of a stream.
///
/// Yields each value in order until the stream is exhausted. The iterator
/// stops for good at end-of-stream or after the first error.
#[derive(Debug)]
pub struct Values<R> {
    reader: R,
    limits: ReadLimits,
    done: bool,
}

/// Iterate over every JSON value in `reader`.
///
/// ```
/// use jsonmore_core::stream::{values, ReadLimits};
///
/// let input: &[u8] = b"1 2\n{\"three\":3}";
/// let all: Vec<_> = values(input, ReadLimits::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(all.len(), 3);
/// ```
pub fn values<R: BufRead>(reader: R, limits: ReadLimits) -> Values<R> {
    Values {
        reader,
        limits,
        done: false,
    }
}

impl<R> Values<R> {
    /// Give back the reader, positioned after the last value read.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for Values<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_with(&mut self.reader, &self.limits) {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for Values<R> {}
