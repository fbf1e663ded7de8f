//! The token source contract.
//!
//! A [`TokenSource`] supplies the low-level tokens a [`crate::Reader`] sequences. It knows the
//! concrete format (a textual lexer, a binary decoder, an in-memory token list), the reader knows
//! the grammar. Implementations are never called out of order: the reader only invokes a method
//! when its state machine says the matching token is expected.

use crate::Error;

/// Shape of the value at the current position.
///
/// Only used to decide how to discard a value that the caller never reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    /// A nested object.
    Object,
    /// A nested array.
    Array,
    /// A scalar, including null.
    Primitive,
}

/// Low-level token primitives consumed by a [`crate::Reader`].
///
/// String and byte reads take a `quota`: implementations must fail with
/// [`Error::QuotaExceeded`] instead of allocating when the encoded value is larger, and must
/// never return a truncated value.
pub trait TokenSource {
    /// Representation of an object member key.
    type Key;

    /// Reads the start of an object.
    ///
    /// Returns `false` if the value at the current position is null.
    fn read_start_object_token(&mut self) -> Result<bool, Error>;

    /// Reads the first member key of an object that was just started.
    ///
    /// Returns `None` if the object terminator follows. The default calls
    /// [`TokenSource::read_next_member_key`].
    fn read_first_member_key(&mut self) -> Result<Option<Self::Key>, Error> {
        self.read_next_member_key()
    }

    /// Reads the next member key, or `None` if positioned at the object terminator.
    fn read_next_member_key(&mut self) -> Result<Option<Self::Key>, Error>;

    /// Consumes the object terminator.
    fn read_end_object_token(&mut self) -> Result<(), Error>;

    /// Reads the start of an array.
    ///
    /// Returns `false` if the value at the current position is null.
    fn read_start_array_token(&mut self) -> Result<bool, Error>;

    /// Advances to the first value of an array that was just started.
    ///
    /// The default calls [`TokenSource::read_to_next_array_value`].
    fn read_to_first_array_value(&mut self) -> Result<bool, Error> {
        self.read_to_next_array_value()
    }

    /// Advances to the next array value, returns `false` if positioned at the array terminator.
    fn read_to_next_array_value(&mut self) -> Result<bool, Error>;

    /// Consumes the array terminator.
    fn read_end_array_token(&mut self) -> Result<(), Error>;

    fn read_bool(&mut self) -> Result<bool, Error>;

    fn read_i32(&mut self) -> Result<i32, Error>;

    fn read_u32(&mut self) -> Result<u32, Error>;

    fn read_i64(&mut self) -> Result<i64, Error>;

    fn read_u64(&mut self) -> Result<u64, Error>;

    fn read_f32(&mut self) -> Result<f32, Error>;

    fn read_f64(&mut self) -> Result<f64, Error>;

    /// Decodes a byte sequence of at most `quota` bytes.
    fn read_bytes(&mut self, quota: usize) -> Result<Vec<u8>, Error>;

    /// Decodes a string of at most `quota` bytes.
    fn read_string(&mut self, quota: usize) -> Result<String, Error>;

    /// Returns the shape of the value at the current position without consuming it.
    fn peek_value_type(&mut self) -> Result<ValueType, Error>;

    /// Discards the primitive at the current position without decoding it.
    fn skip_primitive_value(&mut self) -> Result<(), Error>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    type Key = S::Key;

    fn read_start_object_token(&mut self) -> Result<bool, Error> {
        (**self).read_start_object_token()
    }

    fn read_first_member_key(&mut self) -> Result<Option<Self::Key>, Error> {
        (**self).read_first_member_key()
    }

    fn read_next_member_key(&mut self) -> Result<Option<Self::Key>, Error> {
        (**self).read_next_member_key()
    }

    fn read_end_object_token(&mut self) -> Result<(), Error> {
        (**self).read_end_object_token()
    }

    fn read_start_array_token(&mut self) -> Result<bool, Error> {
        (**self).read_start_array_token()
    }

    fn read_to_first_array_value(&mut self) -> Result<bool, Error> {
        (**self).read_to_first_array_value()
    }

    fn read_to_next_array_value(&mut self) -> Result<bool, Error> {
        (**self).read_to_next_array_value()
    }

    fn read_end_array_token(&mut self) -> Result<(), Error> {
        (**self).read_end_array_token()
    }

    fn read_bool(&mut self) -> Result<bool, Error> {
        (**self).read_bool()
    }

    fn read_i32(&mut self) -> Result<i32, Error> {
        (**self).read_i32()
    }

    fn read_u32(&mut self) -> Result<u32, Error> {
        (**self).read_u32()
    }

    fn read_i64(&mut self) -> Result<i64, Error> {
        (**self).read_i64()
    }

    fn read_u64(&mut self) -> Result<u64, Error> {
        (**self).read_u64()
    }

    fn read_f32(&mut self) -> Result<f32, Error> {
        (**self).read_f32()
    }

    fn read_f64(&mut self) -> Result<f64, Error> {
        (**self).read_f64()
    }

    fn read_bytes(&mut self, quota: usize) -> Result<Vec<u8>, Error> {
        (**self).read_bytes(quota)
    }

    fn read_string(&mut self, quota: usize) -> Result<String, Error> {
        (**self).read_string(quota)
    }

    fn peek_value_type(&mut self) -> Result<ValueType, Error> {
        (**self).peek_value_type()
    }

    fn skip_primitive_value(&mut self) -> Result<(), Error> {
        (**self).skip_primitive_value()
    }
}
