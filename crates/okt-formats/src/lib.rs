//! Oktalyzer (OKT) module parser.
//!
//! Decodes the chunked Amiga Oktalyzer format from an in-memory byte buffer
//! into the `okt-ir` song representation. The parser is deliberately lenient:
//! once the fixed header has validated, truncated or short chunks end the
//! parse with whatever was decoded so far rather than failing (see
//! [`LoadStatus`]).

mod okt_format;
mod reader;

pub use okt_format::{
    load_okt, probe_okt, LoadStatus, LoadedSong, MAX_CHANNELS, MAX_ORDERS, MAX_PATTERNS,
    MAX_SAMPLES,
};

use thiserror::Error;

/// Error type for format parsing.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Not this format: magic tags or fixed header invariants failed.
    /// The caller should try other format detectors.
    #[error("not an Oktalyzer module")]
    UnrecognizedFormat,
    /// A read or skip would pass the end of the buffer. Only surfaces from
    /// [`load_okt`] for buffers below the minimum plausible size; past the
    /// header it is converted into a truncated-but-successful result.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// A pattern cell grid could not be allocated. Fatal for this parse.
    #[error("pattern grid allocation failed")]
    AllocationFailed,
}
