//! The pull reader.
//!
//! A [`Reader`] walks a serialized value one navigation call at a time. Nesting is tracked on an
//! explicit stack of [`State`]s rather than on the call stack, so skipping a value of any depth
//! is a flat loop.
//!
//! ## Example
//!
//! ```
//! use objread::{Reader, tokens::Tokens};
//!
//! let tokens = Tokens::from_json_str(r#"{"name": "probe", "tags": ["a", "b"]}"#).unwrap();
//! let mut reader = Reader::new(tokens);
//!
//! assert!(reader.read_start_object().unwrap());
//! while reader.move_to_next_member().unwrap() {
//!     if reader.member_key().map(String::as_str) == Some("name") {
//!         assert_eq!(reader.read_string(64).unwrap(), "probe");
//!     }
//!     // "tags" is never read, the next move skips it.
//! }
//! reader.read_end_object().unwrap();
//! assert_eq!(reader.depth(), 0);
//! ```

use std::fmt;

use crate::{
    Error, State, TokenSource,
    state::{Operation, violation},
};

/// Default maximum nesting depth of objects and arrays, unbounded.
pub const DEFAULT_MAX_DEPTH: usize = usize::MAX;

/// A pull reader over a [`TokenSource`].
///
/// The reader is strictly sequential: every method takes `&mut self` and no state is shared.
pub struct Reader<S: TokenSource> {
    /// The token source supplying the raw tokens.
    source: S,
    /// State stack. Never empty, `State::Initial` stays at the bottom.
    states: Vec<State>,
    /// Key of the current object member.
    member_key: Option<S::Key>,
    /// Maximum nesting depth.
    max_depth: usize,
}

impl<S: TokenSource> Reader<S> {
    /// Creates a new reader positioned before the top-level value.
    pub fn new(source: S) -> Self {
        Self {
            source,
            states: vec![State::Initial],
            member_key: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting depth.
    ///
    /// Starting an object or array beyond this depth fails with
    /// [`Error::DepthLimitExceeded`]. If not set, nesting is unbounded ([`DEFAULT_MAX_DEPTH`]).
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the key of the current object member.
    ///
    /// `None` outside of an object member, and after a nested object was started or ended.
    pub fn member_key(&self) -> Option<&S::Key> {
        self.member_key.as_ref()
    }

    /// Returns the active state.
    pub fn state(&self) -> State {
        *self.states.last().unwrap_or(&State::Initial)
    }

    /// Returns the current nesting depth, `0` at the top level.
    pub fn depth(&self) -> usize {
        self.states.len() - 1
    }

    /// Returns a reference to the token source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Returns a mutable reference to the token source.
    ///
    /// Consuming tokens through this reference desynchronizes the reader.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the reader, returning the token source.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads the start of an object.
    ///
    /// Returns `false` if the value is null. Resets the current member key.
    pub fn read_start_object(&mut self) -> Result<bool, Error> {
        self.start_object()
    }

    /// Moves to the next member of the current object.
    ///
    /// Returns `false` at the end of the object, in which case [`Reader::read_end_object`] is the
    /// only legal call. If the value of the previous member was not read, it is skipped.
    pub fn move_to_next_member(&mut self) -> Result<bool, Error> {
        self.next_member()
    }

    /// Reads the end of the current object and resets the current member key.
    pub fn read_end_object(&mut self) -> Result<(), Error> {
        self.end_object()
    }

    /// Reads the start of an array.
    ///
    /// Returns `false` if the value is null.
    pub fn read_start_array(&mut self) -> Result<bool, Error> {
        self.start_array()
    }

    /// Moves to the next value of the current array.
    ///
    /// Returns `false` at the end of the array, in which case [`Reader::read_end_array`] is the
    /// only legal call. If the previous value was not read, it is skipped.
    pub fn move_to_next_array_value(&mut self) -> Result<bool, Error> {
        self.next_array_value()
    }

    /// Reads the end of the current array.
    pub fn read_end_array(&mut self) -> Result<(), Error> {
        self.end_array()
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        self.commit_primitive()?;
        self.source.read_bool()
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.commit_primitive()?;
        self.source.read_i32()
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.commit_primitive()?;
        self.source.read_u32()
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.commit_primitive()?;
        self.source.read_i64()
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.commit_primitive()?;
        self.source.read_u64()
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.commit_primitive()?;
        self.source.read_f32()
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.commit_primitive()?;
        self.source.read_f64()
    }

    /// Reads the current value as bytes.
    ///
    /// Fails with [`Error::QuotaExceeded`] if the value is longer than `quota` bytes.
    pub fn read_bytes(&mut self, quota: usize) -> Result<Vec<u8>, Error> {
        self.commit_primitive()?;
        self.source.read_bytes(quota)
    }

    /// Reads the current value as a string.
    ///
    /// Fails with [`Error::QuotaExceeded`] if the encoded value is longer than `quota` bytes.
    pub fn read_string(&mut self, quota: usize) -> Result<String, Error> {
        self.commit_primitive()?;
        self.source.read_string(quota)
    }

    /// Skips the unread value at the current position, whatever its shape.
    ///
    /// Legal before the top-level value, on an unread member value and on an unread array value.
    pub fn skip_value(&mut self) -> Result<(), Error> {
        match self.state() {
            State::Initial | State::MemberKey | State::StartArrayValue => self.skip(),
            state => Err(violation(Operation::SkipValue, state)),
        }
    }

    /// Steps the active state's skip handler until the stack is back at its entry depth.
    pub(crate) fn skip(&mut self) -> Result<(), Error> {
        let depth = self.states.len();
        log::debug!("skipping value in state {} at depth {}", self.state(), depth - 1);

        loop {
            self.skip_step()?;
            if self.states.len() <= depth {
                break;
            }
        }

        log::debug!("skipped value, now in state {}", self.state());
        Ok(())
    }

    pub(crate) fn push_state(&mut self, state: State) -> Result<(), Error> {
        if self.depth() >= self.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }

        log::trace!("push {state} at depth {}", self.states.len());
        self.states.push(state);
        Ok(())
    }

    pub(crate) fn set_state(&mut self, state: State) {
        debug_assert!(self.states.len() > 1, "initial state cannot be replaced");

        log::trace!("set {state} at depth {}", self.depth());
        if let Some(top) = self.states.last_mut() {
            *top = state;
        }
    }

    pub(crate) fn pop_state(&mut self) {
        debug_assert!(self.states.len() > 1, "initial state cannot be popped");

        if self.states.len() > 1 {
            let state = self.states.pop();
            log::trace!("pop {state:?} to depth {}", self.depth());
        }
    }

    pub(crate) fn set_member_key(&mut self, key: Option<S::Key>) {
        self.member_key = key;
    }
}

impl<S> fmt::Debug for Reader<S>
where
    S: TokenSource + fmt::Debug,
    S::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("source", &self.source)
            .field("states", &self.states)
            .field("member_key", &self.member_key)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
