use thiserror::Error;

/// Failure to parse wire bytes into a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("trailing bytes after transaction")]
    TrailingBytes,

    #[error("length prefix is not in canonical form")]
    NonCanonicalSize,

    #[error("integer has leading zero bytes")]
    NonCanonicalInteger,

    #[error("integer does not fit in the target width")]
    IntegerOverflow,

    #[error("declared length overflows the address space")]
    LengthOverflow,

    #[error("expected a list, found a string")]
    ExpectedList,

    #[error("expected a string, found a list")]
    ExpectedString,

    #[error("list has fewer elements than the record requires")]
    TooFewElements,

    #[error("list has more elements than the record allows")]
    TooManyElements,

    #[error("unknown transaction type: {0}")]
    UnknownTxType(u64),

    #[error("address must be 20 bytes, got {0}")]
    InvalidAddressLength(usize),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

/// Failure to encode a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("negative integer cannot be encoded: {0}")]
    NegativeInteger(String),
}
