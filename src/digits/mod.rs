//! The digit pipeline: split comma-separated text, parse digits, print them.
//!
//! ```text
//! "11,22,3b3" -> [splitter] -> "11" "22" "3b3"
//!             -> [digits]   -> 1 1 2 2 3 3  + NonDigit('b' in "3b3")
//!             -> [printer]  -> "1" "1" "2" "2" "3" "3"
//! ```

mod digit;
pub mod error;
pub mod pipeline;
mod printer;
mod splitter;

pub use digit::DigitParser;
pub use error::DigitError;
pub use pipeline::DigitPipeline;
pub use printer::Stringifier;
pub use splitter::Splitter;
