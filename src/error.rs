//! Error types for the flame generator.

use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    /// The chaos game stepped outside the valid numeric range.  The
    /// run's partial output is meaningless; callers discard it whole.
    #[fail(display = "flame iteration left the valid numeric range")]
    NumericOverflow,

    /// A generator was handed an element with no flames to work from.
    #[fail(display = "element declares no flames")]
    EmptyElement,

    /// A generator that works over an element's children (such as
    /// interpolation) was handed a childless element.
    #[fail(display = "element has no children to work from")]
    NoChildren,

    /// The expand generator was pointed past the declared variations.
    #[fail(
        display = "variation index {} is out of range ({} declared)",
        index, count
    )]
    VariationIndex { index: usize, count: usize },

    /// The flame document could not be read or was not JSON at all.
    /// (Malformed nodes inside a well-formed document do not error;
    /// they degrade to defaults and a warning.)
    #[fail(display = "could not read flame document: {}", _0)]
    Document(String),
}
