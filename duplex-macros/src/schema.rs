//! Implementation of the `schema!` macro.

use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{
    Attribute, Ident, LitStr, Token, Type, Visibility, braced, parenthesized,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    token,
};

pub(crate) struct SchemaDef {
    attrs: Vec<Attribute>,
    vis: Visibility,
    name: Ident,
    entries: Punctuated<Entry, Token![,]>,
}

struct Entry {
    attrs: Vec<Attribute>,
    key: LitStr,
    marker: Ident,
    request: Option<Type>,
    response: Option<Type>,
}

impl Parse for SchemaDef {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        let name = input.parse()?;

        let content;
        braced!(content in input);
        let entries = content.parse_terminated(Entry::parse, Token![,])?;

        Ok(Self {
            attrs,
            vis,
            name,
            entries,
        })
    }
}

impl Parse for Entry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let key: LitStr = input.parse()?;
        input.parse::<Token![=>]>()?;
        let marker: Ident = input.parse()?;

        let request = if input.peek(token::Paren) {
            let content;
            parenthesized!(content in input);
            Some(content.parse()?)
        } else {
            None
        };

        let response = if input.peek(Token![->]) {
            input.parse::<Token![->]>()?;
            Some(input.parse()?)
        } else {
            None
        };

        Ok(Self {
            attrs,
            key,
            marker,
            request,
            response,
        })
    }
}

fn validate(def: &SchemaDef) -> syn::Result<()> {
    let mut keys = HashSet::new();
    let mut markers = HashSet::new();

    for entry in &def.entries {
        let key = entry.key.value();
        if key.is_empty() {
            return Err(syn::Error::new_spanned(&entry.key, "message key must not be empty"));
        }
        if !keys.insert(key.clone()) {
            return Err(syn::Error::new_spanned(
                &entry.key,
                format!("duplicate message key `{key}` in schema `{}`", def.name),
            ));
        }
        if entry.marker == def.name || !markers.insert(entry.marker.to_string()) {
            return Err(syn::Error::new_spanned(
                &entry.marker,
                format!("duplicate type name `{}` in schema `{}`", entry.marker, def.name),
            ));
        }
    }
    Ok(())
}

pub(crate) fn expand(def: SchemaDef) -> syn::Result<TokenStream> {
    validate(&def)?;

    let SchemaDef {
        attrs,
        vis,
        name,
        entries,
    } = def;

    let markers = entries.iter().map(|e| &e.marker);
    let keys = entries.iter().map(|e| &e.key);
    let indices = 0..entries.len();

    let messages = entries.iter().map(|entry| {
        let Entry {
            attrs: entry_attrs,
            key,
            marker,
            request,
            response,
        } = entry;

        let (request_ty, request_shape, convention) = match request {
            Some(ty) => (
                quote!(#ty),
                quote!(::duplex::Shape::Payload),
                quote!(::duplex::Unary),
            ),
            None => (
                quote!(()),
                quote!(::duplex::Shape::Empty),
                quote!(::duplex::Nullary),
            ),
        };
        let (response_ty, response_shape) = match response {
            Some(ty) => (quote!(#ty), quote!(::duplex::Shape::Payload)),
            None => (quote!(()), quote!(::duplex::Shape::Empty)),
        };

        quote! {
            #(#entry_attrs)*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            #vis struct #marker;

            impl ::duplex::Duplex for #marker {
                const KEY: &'static str = #key;
                const REQUEST: ::duplex::Shape = #request_shape;
                const RESPONSE: ::duplex::Shape = #response_shape;
                type Request = #request_ty;
                type Response = #response_ty;
            }

            impl #convention for #marker {}

            impl ::duplex::Member<#name> for #marker {}
        }
    });

    Ok(quote! {
        #(#attrs)*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        #vis struct #name;

        impl #name {
            /// Descriptors of every message, in declaration order.
            pub const DESCRIPTORS: &'static [::duplex::Descriptor] = &[
                #(::duplex::Descriptor::of::<#markers>()),*
            ];
        }

        impl ::duplex::Schema for #name {
            const NAME: &'static str = ::core::stringify!(#name);

            fn descriptors() -> &'static [::duplex::Descriptor] {
                Self::DESCRIPTORS
            }

            fn descriptor(key: &str) -> ::core::option::Option<&'static ::duplex::Descriptor> {
                match key {
                    #(#keys => ::core::option::Option::Some(&Self::DESCRIPTORS[#indices]),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        #(#messages)*
    })
}
