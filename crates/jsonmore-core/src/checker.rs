//! Incremental JSON grammar checker.
//!
//! [`Checker`] is a push-down automaton fed one byte at a time. It never
//! builds a tree and keeps only a stack of open containers, so memory is
//! bounded by the depth limit. The stream reader uses it to find where a
//! single value ends without buffering the rest of the stream.
//!
//! # Completion
//!
//! Strings, containers and literals end on a byte that belongs to them, and
//! [`Step::Complete`] is returned for that byte. A bare top-level number
//! only ends when a byte that cannot belong to it arrives; that byte is
//! reported as [`Step::CompleteBefore`] and is not part of the value. At
//! end-of-stream, [`Checker::finish_at_eof`] accepts a number that was
//! still open.
//!
//! # Example
//! ```
//! use jsonmore_core::checker::{Checker, Step};
//!
//! let mut checker = Checker::new(8);
//! let steps: Vec<Step> = br#"[1,{"a":null}]"#
//!     .iter()
//!     .map(|b| checker.push(*b).unwrap())
//!     .collect();
//! assert_eq!(steps.last(), Some(&Step::Complete));
//! ```

use thiserror::Error;

/// Nesting limit used when the caller does not pick one.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Outcome of feeding one byte to the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The byte was accepted and the value is still open.
    Continue,
    /// The byte was accepted and closed the top-level value.
    Complete,
    /// The top-level value (a bare number) ended before this byte.
    /// The byte is not part of the value and must stay in the stream.
    CompleteBefore,
}

/// Why the checker rejected a byte.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unexpected byte {}", printable(.byte))]
    Unexpected { byte: u8 },

    #[error("nesting deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("value is already complete")]
    Finished,
}

fn printable(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", char::from(*byte))
    } else {
        format!("0x{byte:02x}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Any value may start here (top level, after `:`, after `,` in an array).
    Value,
    /// Just after `[`: a value or `]`.
    ArrayFirst,
    /// Just after `{`: a key or `}`.
    ObjectFirst,
    /// After `,` inside an object.
    Key,
    /// After a key string.
    Colon,
    /// After a value inside a container: `,` or the closing bracket.
    AfterValue,
    String { key: bool },
    Escape { key: bool },
    Unicode { key: bool, left: u8 },
    Literal { rest: &'static [u8] },
    Minus,
    Zero,
    Int,
    Point,
    Frac,
    Exp,
    ExpSign,
    ExpInt,
    Done,
}

/// Byte-at-a-time JSON well-formedness checker.
///
/// Build a fresh one for every value; it holds no state shared with other
/// checkers.
#[derive(Debug, Clone)]
pub struct Checker {
    state: State,
    stack: Vec<Frame>,
    max_depth: usize,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Checker {
    pub fn new(max_depth: usize) -> Self {
        Self {
            state: State::Value,
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True once a full top-level value has been seen.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Whether the input seen so far is a complete value if the stream ends
    /// here. Only differs from [`is_done`](Self::is_done) for a bare
    /// top-level number that no delimiter has terminated yet.
    pub fn finish_at_eof(&self) -> bool {
        match self.state {
            State::Done => true,
            State::Zero | State::Int | State::Frac | State::ExpInt => self.stack.is_empty(),
            _ => false,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<Step, SyntaxError> {
        match self.state {
            State::Done => Err(SyntaxError::Finished),
            State::Value => self.begin_value(byte),
            State::ArrayFirst => match byte {
                b']' => self.close(Frame::Array, byte),
                _ => self.begin_value(byte),
            },
            State::ObjectFirst => match byte {
                b'}' => self.close(Frame::Object, byte),
                b'"' => self.enter(State::String { key: true }),
                b if is_space(b) => Ok(Step::Continue),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::Key => match byte {
                b'"' => self.enter(State::String { key: true }),
                b if is_space(b) => Ok(Step::Continue),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::Colon => match byte {
                b':' => self.enter(State::Value),
                b if is_space(b) => Ok(Step::Continue),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::AfterValue => match byte {
                b',' => match self.stack.last().copied() {
                    Some(Frame::Object) => self.enter(State::Key),
                    Some(Frame::Array) => self.enter(State::Value),
                    None => Err(SyntaxError::Unexpected { byte }),
                },
                b']' => self.close(Frame::Array, byte),
                b'}' => self.close(Frame::Object, byte),
                b if is_space(b) => Ok(Step::Continue),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::String { key } => match byte {
                b'"' if key => self.enter(State::Colon),
                b'"' => Ok(self.value_done()),
                b'\\' => self.enter(State::Escape { key }),
                0x00..=0x1f => Err(SyntaxError::Unexpected { byte }),
                _ => Ok(Step::Continue),
            },
            State::Escape { key } => match byte {
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                    self.enter(State::String { key })
                }
                b'u' => self.enter(State::Unicode { key, left: 4 }),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::Unicode { key, left } => {
                if !byte.is_ascii_hexdigit() {
                    return Err(SyntaxError::Unexpected { byte });
                }
                if left == 1 {
                    self.enter(State::String { key })
                } else {
                    self.enter(State::Unicode {
                        key,
                        left: left - 1,
                    })
                }
            }
            State::Literal { rest } => match rest.split_first() {
                Some((expected, [])) if *expected == byte => Ok(self.value_done()),
                Some((expected, tail)) if *expected == byte => {
                    self.enter(State::Literal { rest: tail })
                }
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::Minus => match byte {
                b'0' => self.enter(State::Zero),
                b'1'..=b'9' => self.enter(State::Int),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::Zero => match byte {
                b'.' => self.enter(State::Point),
                b'e' | b'E' => self.enter(State::Exp),
                _ => self.end_number(byte),
            },
            State::Int => match byte {
                b'0'..=b'9' => Ok(Step::Continue),
                b'.' => self.enter(State::Point),
                b'e' | b'E' => self.enter(State::Exp),
                _ => self.end_number(byte),
            },
            State::Point => match byte {
                b'0'..=b'9' => self.enter(State::Frac),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::Frac => match byte {
                b'0'..=b'9' => Ok(Step::Continue),
                b'e' | b'E' => self.enter(State::Exp),
                _ => self.end_number(byte),
            },
            State::Exp => match byte {
                b'+' | b'-' => self.enter(State::ExpSign),
                b'0'..=b'9' => self.enter(State::ExpInt),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::ExpSign => match byte {
                b'0'..=b'9' => self.enter(State::ExpInt),
                _ => Err(SyntaxError::Unexpected { byte }),
            },
            State::ExpInt => match byte {
                b'0'..=b'9' => Ok(Step::Continue),
                _ => self.end_number(byte),
            },
        }
    }

    fn enter(&mut self, state: State) -> Result<Step, SyntaxError> {
        self.state = state;
        Ok(Step::Continue)
    }

    /// Dispatch on the first byte of a value. Whitespace leaves the state
    /// alone so `ArrayFirst` still accepts `]` afterwards.
    fn begin_value(&mut self, byte: u8) -> Result<Step, SyntaxError> {
        match byte {
            b if is_space(b) => Ok(Step::Continue),
            b'{' => self.open(Frame::Object),
            b'[' => self.open(Frame::Array),
            b'"' => self.enter(State::String { key: false }),
            b'-' => self.enter(State::Minus),
            b'0' => self.enter(State::Zero),
            b'1'..=b'9' => self.enter(State::Int),
            b't' => self.enter(State::Literal { rest: b"rue" }),
            b'f' => self.enter(State::Literal { rest: b"alse" }),
            b'n' => self.enter(State::Literal { rest: b"ull" }),
            _ => Err(SyntaxError::Unexpected { byte }),
        }
    }

    fn open(&mut self, frame: Frame) -> Result<Step, SyntaxError> {
        if self.stack.len() >= self.max_depth {
            return Err(SyntaxError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.stack.push(frame);
        self.enter(match frame {
            Frame::Object => State::ObjectFirst,
            Frame::Array => State::ArrayFirst,
        })
    }

    fn close(&mut self, frame: Frame, byte: u8) -> Result<Step, SyntaxError> {
        if self.stack.last() != Some(&frame) {
            return Err(SyntaxError::Unexpected { byte });
        }
        self.stack.pop();
        Ok(self.value_done())
    }

    fn value_done(&mut self) -> Step {
        if self.stack.is_empty() {
            self.state = State::Done;
            Step::Complete
        } else {
            self.state = State::AfterValue;
            Step::Continue
        }
    }

    /// A number has no closing byte: `byte` terminates it and is then
    /// handled by the enclosing container. At the top level only
    /// whitespace may follow.
    fn end_number(&mut self, byte: u8) -> Result<Step, SyntaxError> {
        if self.stack.is_empty() {
            if !is_space(byte) {
                return Err(SyntaxError::Unexpected { byte });
            }
            self.state = State::Done;
            return Ok(Step::CompleteBefore);
        }
        self.state = State::AfterValue;
        self.push(byte)
    }
}

/// JSON insignificant whitespace (RFC 8259 `ws`).
fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}
