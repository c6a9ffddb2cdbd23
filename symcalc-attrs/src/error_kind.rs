use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{spanned::Spanned, Data, DeriveInput, Expr, Fields, Result};

/// The tags of the `#[error(...)]` attribute.
struct ReportSpec {
    message: Expr,
    labels: Option<Expr>,
    help: Option<Expr>,
}

impl ReportSpec {
    /// Collects the tags from every `error` attribute of the item.
    fn from_attrs(input: &DeriveInput) -> Result<Self> {
        let (mut message, mut labels, mut help) = (None, None, None);
        for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("error")) {
            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("message") {
                    &mut message
                } else if meta.path.is_ident("labels") {
                    &mut labels
                } else if meta.path.is_ident("help") {
                    &mut help
                } else {
                    return Err(meta.error("expected `message`, `labels` or `help`"));
                };
                if slot.is_some() {
                    return Err(meta.error("this tag is already set"));
                }
                *slot = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            })?;
        }

        let message = message.ok_or_else(|| {
            syn::Error::new(
                input.ident.span(),
                "an error kind needs a message, e.g. `#[error(message = \"division by zero\")]`",
            )
        })?;
        Ok(Self { message, labels, help })
    }
}

/// Binds the fields of `self` by name, so the tags can refer to them.
fn bind_fields(input: &DeriveInput) -> Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(input.ident.span(), "error kinds must be structs"));
    };
    match &data.fields {
        Fields::Named(fields) => {
            let names = fields.named.iter().filter_map(|field| field.ident.as_ref());
            Ok(quote! { let Self { #(#names),* } = self; })
        },
        Fields::Unnamed(fields) => Err(syn::Error::new(
            fields.span(),
            "error kinds need named fields, so that the message and labels can refer to them",
        )),
        Fields::Unit => Ok(TokenStream2::new()),
    }
}

/// Expands the derive for the item.
pub fn expand(input: DeriveInput) -> Result<TokenStream2> {
    let ReportSpec { message, labels, help } = ReportSpec::from_attrs(&input)?;
    let bind = bind_fields(&input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let labels = labels.map_or_else(|| quote! { Vec::<String>::new() }, |labels| labels.into_token_stream());
    let help = help.map(|help| quote! { builder.set_help(#help); });

    Ok(quote! {
        impl #impl_generics symcalc_error::ErrorKind for #name #ty_generics #where_clause {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #[allow(unused_variables)]
            fn message(&self) -> String {
                #bind
                (#message).to_string()
            }

            #[allow(unused_variables)]
            fn build_report<'a>(
                &self,
                src_id: &'a str,
                spans: &[std::ops::Range<usize>],
            ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                #bind
                let offset = spans.first().map_or(0, |span| span.start);
                let labels = (#labels)
                    .into_iter()
                    .zip(spans)
                    .map(|(text, span)| {
                        let text = text.to_string();
                        let label = ariadne::Label::new((src_id, span.clone()))
                            .with_color(symcalc_error::EXPR);
                        if text.is_empty() {
                            label
                        } else {
                            label.with_message(text)
                        }
                    })
                    .collect::<Vec<_>>();

                #[allow(unused_mut)]
                let mut builder = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                    .with_message(symcalc_error::ErrorKind::message(self))
                    .with_labels(labels);
                #help
                builder.finish()
            }
        }
    })
}
