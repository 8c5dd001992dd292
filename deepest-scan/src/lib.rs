//! Depth-tracking scanner for raw markup.
//!
//! The scanner walks a decoded page body one character at a time, counting
//! open tags with a running depth counter. No tree is ever built: the only
//! outputs are the text recorded at the deepest level reached, or a
//! malformation signal when a closing tag shows up with nothing open.
//!
//! - [`scan`]: full [`ScanReport`] (outcome + recorded depth)
//! - [`find_deepest_text`]: the plain string contract, with
//!   [`MALFORMED_SENTINEL`] standing in for malformed input
//!
//! ```rust
//! use deepest_scan::{find_deepest_text, MALFORMED_SENTINEL};
//!
//! assert_eq!(find_deepest_text("<a>x<b>y</b>z</a>"), "y");
//! assert_eq!(find_deepest_text("</a>"), MALFORMED_SENTINEL);
//! ```

pub mod scanner;

pub use scanner::{find_deepest_text, scan, ScanOutcome, ScanReport, MALFORMED_SENTINEL};
