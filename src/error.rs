use thiserror::Error;

/// The error type for fallible operations of this crate.
///
/// Programmer errors (out-of-range indices, cursors used against the wrong index, malformed
/// search schemes) are not part of this type. Those stay `assert!`/`debug_assert!`, matching the
/// rest of the library: they indicate a bug at the call site, not a condition a caller should
/// recover from.
#[derive(Debug, Error)]
pub enum Error {
    #[error("index construction failed: {0}")]
    Construction(#[from] ConstructionError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),
}

/// Errors that can occur while building an index or a rank structure.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error(
        "forward and reverse BWT lengths disagree: forward is {forward_len}, reverse is {reverse_len}"
    )]
    BwtLengthMismatch {
        forward_len: usize,
        reverse_len: usize,
    },

    #[error("symbol {symbol} is out of range for an alphabet of size {alphabet_size}")]
    AlphabetOverflow { symbol: u8, alphabet_size: usize },

    #[error(
        "concatenated text of length {text_len} does not fit the chosen suffix array width (max {max_len})"
    )]
    TextTooLarge { text_len: usize, max_len: usize },
}

/// Errors that can occur while loading a persisted structure.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("unknown archive version tag {0}")]
    UnknownVersion(u32),

    #[error("archive is truncated, expected at least {expected} more bytes")]
    Truncated { expected: usize },

    #[error("archive requests the '{0}' format, but this build does not support it")]
    UnavailableFormat(&'static str),

    #[cfg(feature = "savefile")]
    #[error(transparent)]
    Savefile(#[from] savefile::SavefileError),
}

/// Errors raised by the `Mutable -> Finalized` state machine of the compressed bitvector
/// variants (see [`crate::bitvector`]).
#[derive(Debug, Error)]
pub enum StateMachineError {
    #[error("push_back called on a bitvector that was already finalized by a rank query")]
    PushBackAfterFinalize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_mention_the_cause() {
        let err = Error::from(ConstructionError::AlphabetOverflow {
            symbol: 9,
            alphabet_size: 5,
        });
        assert!(err.to_string().contains("9"));

        let err = Error::from(StateMachineError::PushBackAfterFinalize);
        assert!(err.to_string().contains("finalized"));
    }
}
