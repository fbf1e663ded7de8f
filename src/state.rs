//! The navigation state machine.
//!
//! Every [`Reader`] operation is routed through the handler for the state on top of the reader's
//! state stack. A handler either performs the transition (replacing the top, pushing a nested
//! state or popping one) or rejects the call with [`Error::InvalidOperation`], in which case
//! nothing is mutated.
//!
//! | State | Legal operations |
//! |---|---|
//! | [`State::Initial`] | start object, start array, skip |
//! | [`State::StartObject`] | next member |
//! | [`State::MemberKey`] | start object, start array, read primitive, next member, skip |
//! | [`State::MemberValue`] | next member |
//! | [`State::EndObject`] | end object |
//! | [`State::StartArray`] | next array value |
//! | [`State::StartArrayValue`] | start object, start array, read primitive, next value, skip |
//! | [`State::EndArrayValue`] | next array value |
//! | [`State::EndArray`] | end array |

use std::fmt;

use crate::{Error, Reader, TokenSource, ValueType};

/// A state of the reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Before the top-level value. Always at the bottom of the stack.
    Initial,
    /// An object was started, no member has been read yet.
    StartObject,
    /// A member key was read, its value has not been read.
    MemberKey,
    /// The value of the current member was read (or is being read).
    MemberValue,
    /// The object terminator is next.
    EndObject,
    /// An array was started, no value has been reached yet.
    StartArray,
    /// Positioned on an array value that has not been read.
    StartArrayValue,
    /// The current array value was read (or is being read).
    EndArrayValue,
    /// The array terminator is next.
    EndArray,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            State::Initial => "initial",
            State::StartObject => "start object",
            State::MemberKey => "member key",
            State::MemberValue => "member value",
            State::EndObject => "end object",
            State::StartArray => "start array",
            State::StartArrayValue => "start array value",
            State::EndArrayValue => "end array value",
            State::EndArray => "end array",
        })
    }
}

/// A navigation operation, as reported in [`Error::InvalidOperation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    ReadStartObject,
    MoveToNextMember,
    ReadEndObject,
    ReadStartArray,
    MoveToNextArrayValue,
    ReadEndArray,
    ReadPrimitive,
    SkipValue,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::ReadStartObject => "read start of object",
            Operation::MoveToNextMember => "move to next member",
            Operation::ReadEndObject => "read end of object",
            Operation::ReadStartArray => "read start of array",
            Operation::MoveToNextArrayValue => "move to next array value",
            Operation::ReadEndArray => "read end of array",
            Operation::ReadPrimitive => "read primitive value",
            Operation::SkipValue => "skip value",
        })
    }
}

pub(crate) fn violation(operation: Operation, state: State) -> Error {
    log::debug!("rejected {operation} in state {state}");
    Error::InvalidOperation { operation, state }
}

impl<S: TokenSource> Reader<S> {
    pub(crate) fn start_object(&mut self) -> Result<bool, Error> {
        match self.state() {
            State::Initial => {}
            State::MemberKey => self.set_state(State::MemberValue),
            State::StartArrayValue => self.set_state(State::EndArrayValue),
            state => return Err(violation(Operation::ReadStartObject, state)),
        }

        self.set_member_key(None);

        if self.get_mut().read_start_object_token()? {
            self.push_state(State::StartObject)?;
            Ok(true)
        } else {
            // null object
            Ok(false)
        }
    }

    pub(crate) fn next_member(&mut self) -> Result<bool, Error> {
        let key = match self.state() {
            State::StartObject => self.get_mut().read_first_member_key()?,
            State::MemberValue => self.get_mut().read_next_member_key()?,
            State::MemberKey => {
                // Value never read by the caller; leaves us in `MemberValue`.
                self.skip()?;
                self.get_mut().read_next_member_key()?
            }
            state => return Err(violation(Operation::MoveToNextMember, state)),
        };

        let found = key.is_some();
        self.set_state(if found {
            State::MemberKey
        } else {
            State::EndObject
        });
        self.set_member_key(key);

        Ok(found)
    }

    pub(crate) fn end_object(&mut self) -> Result<(), Error> {
        match self.state() {
            State::EndObject => {
                self.get_mut().read_end_object_token()?;
                self.pop_state();
                self.set_member_key(None);
                Ok(())
            }
            state => Err(violation(Operation::ReadEndObject, state)),
        }
    }

    pub(crate) fn start_array(&mut self) -> Result<bool, Error> {
        match self.state() {
            State::Initial => {}
            State::MemberKey => self.set_state(State::MemberValue),
            State::StartArrayValue => self.set_state(State::EndArrayValue),
            state => return Err(violation(Operation::ReadStartArray, state)),
        }

        if self.get_mut().read_start_array_token()? {
            self.push_state(State::StartArray)?;
            Ok(true)
        } else {
            // null array
            Ok(false)
        }
    }

    pub(crate) fn next_array_value(&mut self) -> Result<bool, Error> {
        let found = match self.state() {
            State::StartArray => self.get_mut().read_to_first_array_value()?,
            State::EndArrayValue => self.get_mut().read_to_next_array_value()?,
            State::StartArrayValue => {
                self.skip()?;
                self.get_mut().read_to_next_array_value()?
            }
            state => return Err(violation(Operation::MoveToNextArrayValue, state)),
        };

        self.set_state(if found {
            State::StartArrayValue
        } else {
            State::EndArray
        });

        Ok(found)
    }

    pub(crate) fn end_array(&mut self) -> Result<(), Error> {
        match self.state() {
            State::EndArray => {
                self.get_mut().read_end_array_token()?;
                self.pop_state();
                Ok(())
            }
            state => Err(violation(Operation::ReadEndArray, state)),
        }
    }

    /// Commits to reading the value at the current position as a primitive.
    pub(crate) fn commit_primitive(&mut self) -> Result<(), Error> {
        match self.state() {
            State::MemberKey => self.set_state(State::MemberValue),
            State::StartArrayValue => self.set_state(State::EndArrayValue),
            state => return Err(violation(Operation::ReadPrimitive, state)),
        }
        Ok(())
    }

    /// Runs a single step of the skip loop for the active state.
    pub(crate) fn skip_step(&mut self) -> Result<(), Error> {
        match self.state() {
            State::Initial | State::MemberKey | State::StartArrayValue => self.discard_unread(),
            State::StartObject | State::MemberValue => self.next_member().map(drop),
            State::EndObject => self.end_object(),
            State::StartArray | State::EndArrayValue => self.next_array_value().map(drop),
            State::EndArray => self.end_array(),
        }
    }

    /// Starts discarding the value at the current position, dispatching on its peeked shape.
    fn discard_unread(&mut self) -> Result<(), Error> {
        match self.get_mut().peek_value_type()? {
            ValueType::Object => self.start_object().map(drop),
            ValueType::Array => self.start_array().map(drop),
            ValueType::Primitive => {
                // A top-level primitive has no state to commit to.
                if self.state() != State::Initial {
                    self.commit_primitive()?;
                }
                self.get_mut().skip_primitive_value()
            }
        }
    }
}
