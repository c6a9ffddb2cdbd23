//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that carries an error kind together with the text it
//! refers to.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display, Formatter}, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns the error as a [`dyn Any`](Any), so that it can be downcast to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// The one-line message of this error.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of a source text that can be highlighted.
///
/// Symbolic expressions have no source file, so the source of an error is usually the rendered
/// form of the operands involved. Use [`Error::spanning`] to build the source and its spans from
/// those fragments.
#[derive(Debug)]
pub struct Error {
    /// The text the spans of this error point into.
    pub source: String,

    /// The regions of the source text that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given source text, spans and kind.
    pub fn new(source: impl Into<String>, spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { source: source.into(), spans, kind: Box::new(kind) }
    }

    /// Creates a new error whose source text is the given fragments joined by single spaces.
    /// Each fragment becomes one span, in order.
    pub fn spanning<S: AsRef<str>>(fragments: &[S], kind: impl ErrorKind + 'static) -> Self {
        let mut source = String::new();
        let mut spans = Vec::with_capacity(fragments.len());
        for (i, fragment) in fragments.iter().enumerate() {
            if i > 0 {
                source.push(' ');
            }
            let start = source.len();
            source.push_str(fragment.as_ref());
            spans.push(start..source.len());
        }
        Self::new(source, spans, kind)
    }

    /// Returns true if the kind of this error is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<K>()
    }

    /// Returns the kind of this error as `K`, if it is one.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref::<K>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Writes the report of this error into a string. The string contains the ANSI color codes
    /// `ariadne` emits.
    pub fn report_to_string(&self, src_id: &str) -> String {
        let mut buf = Vec::new();
        // writing into a `Vec` does not fail
        let _ = self.build_report(src_id)
            .write((src_id, Source::from(self.source.as_str())), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Prints the report of this error to stderr.
    pub fn eprint(&self, src_id: &str) {
        // a report that cannot be written to stderr has nowhere else to go
        let _ = self.build_report(src_id)
            .eprint((src_id, Source::from(self.source.as_str())));
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}
