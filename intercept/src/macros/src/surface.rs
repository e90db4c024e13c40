use proc_macro::TokenStream;
use quote::quote;
use syn::{FnArg, ImplItem, ItemImpl, parse_macro_input};

pub fn event_surface(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let attr = proc_macro2::TokenStream::from(attr);
        return syn::Error::new_spanned(attr, "#[event_surface] takes no arguments")
            .to_compile_error()
            .into();
    }

    // Parse the impl block we are annotating
    let ast = parse_macro_input!(item as ItemImpl);

    if let Some((_, path, _)) = &ast.trait_ {
        return syn::Error::new_spanned(
            path,
            "#[event_surface] must be placed on an inherent impl block",
        )
        .to_compile_error()
        .into();
    }

    let names: Vec<String> = ast
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(&method.sig),
            _ => None,
        })
        .filter(|sig| {
            let arguments = sig
                .inputs
                .iter()
                .filter(|input| matches!(input, FnArg::Typed(_)))
                .count();
            arguments <= 1
        })
        .map(|sig| sig.ident.to_string())
        .filter(|name| is_event_name(name))
        .collect();

    let self_ty = &ast.self_ty;
    let (impl_generics, _, where_clause) = ast.generics.split_for_impl();

    // Use ::rusty_intercept::EventSurface which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as rusty_intercept;` in lib.rs
    TokenStream::from(quote! {
        #ast

        impl #impl_generics ::rusty_intercept::EventSurface for #self_ty #where_clause {
            fn event_names() -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::String::from(#names)),*]
            }
        }
    })
}

/// Same rule as `rusty_intercept::surface::is_event_name`.
fn is_event_name(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}
