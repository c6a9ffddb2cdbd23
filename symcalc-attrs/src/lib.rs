mod error_kind;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `ErrorKind` trait of `symcalc-error` for a struct describing one kind of failure
/// of the operator layer, the normalizer or the shape overlay.
///
/// The report is described by the `error` attribute:
/// ```ignore
/// use symcalc_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("cannot floor-divide `{}` by zero", numer),
///     labels = ["this numerator", "this denominator is zero"],
///     help = "floor division needs a non-zero denominator",
/// )]
/// pub struct ZeroDenominator {
///     numer: String,
/// }
/// ```
///
/// | Tag       | Value                                                                       |
/// | --------- | --------------------------------------------------------------------------- |
/// | `message` | Required. The one-line message, also used by `Display` of the error.        |
/// | `labels`  | Label texts, matched with the spans of the error in order. Empty texts only highlight their span. |
/// | `help`    | Optional advice shown below the report.                                     |
///
/// Each tag is an expression evaluated with the named fields of the struct bound by reference.
/// Unit structs are accepted; tuple structs and enums are not.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error_kind::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
