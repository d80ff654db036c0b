use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Attribute, Data, DataEnum, DataStruct, DeriveInput, Fields, Ident, Index, Type, Variant};

/// Paths the generated code refers to.
///
/// The `twi_codec` crate must be nameable from the call site, inside the
/// crate itself this is done with `extern crate self as twi_codec`.
struct Paths {
    krate: TokenStream2,
    word: TokenStream2,
}

impl Paths {
    fn new() -> Self {
        Self {
            krate: quote! { twi_codec },
            word: quote! { <twi_codec::encoding::twi::Twi as twi_codec::encoding::Encoding>::Word },
        }
    }
}

fn repr_of(item: &DeriveInput) -> syn::Result<Type> {
    item.attrs
        .iter()
        .find(|attr| attr.path().is_ident("repr"))
        .map(Attribute::parse_args::<Type>)
        .unwrap_or_else(|| {
            Err(syn::Error::new_spanned(
                &item.ident,
                "sub-command enums need a #[repr(u8)] attribute",
            ))
        })
}

/// Wire bytes for every variant.
///
/// Variants without an explicit discriminant continue counting from the
/// previous one, so `Rewind = b'A', Previous` puts `Previous` on `b'B'`.
fn tags<'a>(variants: impl Iterator<Item = &'a Variant>) -> Vec<TokenStream2> {
    let mut anchor = quote! { 0 };
    let mut offset = 0usize;

    variants
        .map(|variant| {
            let tag = match &variant.discriminant {
                Some((_, expr)) => {
                    anchor = quote! { #expr };
                    offset = 0;
                    anchor.clone()
                }
                None => {
                    let step = Index::from(offset);
                    quote! { #anchor + #step }
                }
            };
            offset += 1;
            tag
        })
        .collect()
}

fn field_types(fields: &Fields) -> Vec<&Type> {
    fields.iter().map(|field| &field.ty).collect()
}

/// Bindings used when destructuring a variant or struct body.
fn bindings(fields: &Fields) -> Vec<Ident> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            field
                .ident
                .clone()
                .unwrap_or_else(|| format_ident!("field{i}"))
        })
        .collect()
}

/// Rebuild `Self` (or a variant) from the bindings produced by [`bindings`].
fn construct(head: TokenStream2, fields: &Fields, names: &[Ident]) -> TokenStream2 {
    match fields {
        Fields::Unit => head,
        Fields::Unnamed(_) => quote! { #head ( #(#names),* ) },
        Fields::Named(_) => quote! { #head { #(#names),* } },
    }
}

fn struct_body(s: &DataStruct, paths: &Paths) -> (TokenStream2, TokenStream2) {
    let krate = &paths.krate;
    let types = field_types(&s.fields);
    let names = bindings(&s.fields);
    let pattern = construct(quote! { Self }, &s.fields, &names);

    let serialize = quote! {
        let mut dst = dst.into_iter();
        let #pattern = self;

        #(
            #krate::SerializeIter::serialize_iter(#names, &mut dst)?;
        )*

        Ok(())
    };

    let deserialize = quote! {
        let mut src = src.into_iter();

        #(
            let #names = <#types as #krate::SerializeIter>::deserialize_iter(&mut src)?;
        )*

        Ok(#pattern)
    };

    (serialize, deserialize)
}

fn enum_body(e: &DataEnum, repr: &Type, paths: &Paths) -> (TokenStream2, TokenStream2) {
    let krate = &paths.krate;
    let tags = tags(e.variants.iter());
    let consts: Vec<_> = e
        .variants
        .iter()
        .map(|variant| {
            format_ident!(
                "{}_TAG",
                inflector::cases::screamingsnakecase::to_screaming_snake_case(
                    &variant.ident.to_string()
                )
            )
        })
        .collect();

    let declarations = quote! {
        #(
            const #consts: #repr = #tags;
        )*
    };

    let mut ser_arms = Vec::new();
    let mut deser_arms = Vec::new();

    for (variant, tag) in e.variants.iter().zip(&consts) {
        let ident = &variant.ident;
        let types = field_types(&variant.fields);
        let names = bindings(&variant.fields);
        let pattern = construct(quote! { Self::#ident }, &variant.fields, &names);

        ser_arms.push(quote! {
            #pattern => {
                #krate::SerializeIter::serialize_iter(&#tag, &mut dst)?;
                #(
                    #krate::SerializeIter::serialize_iter(#names, &mut dst)?;
                )*
            }
        });

        deser_arms.push(quote! {
            #tag => {
                #(
                    let #names = <#types as #krate::SerializeIter>::deserialize_iter(&mut src)?;
                )*

                Ok(#pattern)
            }
        });
    }

    let serialize = quote! {
        #declarations

        let mut dst = dst.into_iter();

        match self {
            #(#ser_arms)*
        }

        Ok(())
    };

    let deserialize = quote! {
        #declarations

        let mut src = src.into_iter();

        match <#repr as #krate::SerializeIter>::deserialize_iter(&mut src)? {
            #(#deser_arms)*
            _ => Err(#krate::error::Error::Invalid),
        }
    };

    (serialize, deserialize)
}

fn size_sum(types: &[&Type], paths: &Paths) -> TokenStream2 {
    let krate = &paths.krate;

    if types.is_empty() {
        quote! { 0 }
    } else {
        quote! { #( <#types as #krate::SerializeBuf>::SIZE )+* }
    }
}

fn enum_size(e: &DataEnum, repr: &Type, paths: &Paths) -> TokenStream2 {
    let krate = &paths.krate;
    // unit variants add nothing past the tag
    let sizes: Vec<_> = e
        .variants
        .iter()
        .filter(|variant| !variant.fields.is_empty())
        .map(|variant| size_sum(&field_types(&variant.fields), paths))
        .collect();

    if sizes.is_empty() {
        return quote! { <#repr as #krate::SerializeBuf>::SIZE };
    }

    quote! {{
        let mut widest = 0;

        #(
            if #sizes > widest {
                widest = #sizes;
            }
        )*

        <#repr as #krate::SerializeBuf>::SIZE + widest
    }}
}

fn expand_iter(item: &DeriveInput) -> syn::Result<TokenStream2> {
    let paths = Paths::new();
    let (krate, word) = (&paths.krate, &paths.word);
    let ident = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let (serialize, deserialize) = match &item.data {
        Data::Struct(s) => struct_body(s, &paths),
        Data::Enum(e) => enum_body(e, &repr_of(item)?, &paths),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "the TWI serializer supports structs and enums only",
            ))
        }
    };

    Ok(quote! {
        impl #impl_generics #krate::SerializeIter for #ident #ty_generics #where_clause {
            fn serialize_iter<'a>(
                &self,
                dst: impl IntoIterator<Item = &'a mut #word>,
            ) -> Result<(), #krate::error::Error>
            where
                #word: 'a,
            {
                #serialize
            }

            fn deserialize_iter<'a>(
                src: impl IntoIterator<Item = &'a #word>,
            ) -> Result<Self, #krate::error::Error>
            where
                #word: 'a,
            {
                #deserialize
            }
        }
    })
}

fn expand_buf(item: &DeriveInput) -> syn::Result<TokenStream2> {
    let paths = Paths::new();
    let krate = &paths.krate;
    let ident = &item.ident;

    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "SerializeBuf needs a concrete size, generic types can only derive SerializeIter",
        ));
    }

    let size = match &item.data {
        Data::Struct(s) => size_sum(&field_types(&s.fields), &paths),
        Data::Enum(e) => enum_size(e, &repr_of(item)?, &paths),
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "the TWI serializer supports structs and enums only",
            ))
        }
    };

    Ok(quote! {
        impl #krate::SerializeBuf for #ident {
            const SIZE: usize = #size;
            type Serialized = [u8; #size];
        }
    })
}

pub fn serialize_iter(item: TokenStream) -> TokenStream {
    syn::parse::<DeriveInput>(item)
        .and_then(|item| expand_iter(&item))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

pub fn serialize_buf(item: TokenStream) -> TokenStream {
    syn::parse::<DeriveInput>(item)
        .and_then(|item| expand_buf(&item))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
