//! Derive macro for BCS serialization.
//!
//! Generates `Encode` and `Decode` implementations for structs and enums.
//!
//! # Supported Types
//!
//! - **Named structs**: `struct Foo { a: u32, b: u64 }`
//! - **Tuple structs**: `struct Bar(u32, u64)`
//! - **Unit structs**: `struct Baz`
//! - **Enums**: `enum Payload { Transfer { amount: u64 }, Noop }`
//!
//! Unions are not supported.
//!
//! # Binary Format
//!
//! Fields are serialized in declaration order following the BCS rules:
//! integers are little-endian fixed-width, sequences carry a ULEB128 length
//! prefix, and enums are encoded as a ULEB128 variant index followed by the
//! variant's fields. Explicit discriminants (e.g., `EntryFunction = 2`) pin a
//! variant to a protocol-defined index.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DataEnum, DeriveInput, Fields};

/// Derives `Encode` and `Decode` for a type.
///
/// # Example
///
/// ```ignore
/// use aptos_derive::BcsCodec;
///
/// #[derive(BcsCodec)]
/// pub struct ModuleId {
///     pub address: AccountAddress,
///     pub name: String,
/// }
/// ```
///
/// # Generated Code
///
/// ```ignore
/// impl Encode for ModuleId {
///     fn encode<S: EncodeSink>(&self, out: &mut S) -> Result<(), EncodeError> {
///         self.address.encode(out)?;
///         self.name.encode(out)?;
///         Ok(())
///     }
/// }
///
/// impl Decode for ModuleId {
///     fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
///         Ok(Self {
///             address: AccountAddress::decode(input)?,
///             name: String::decode(input)?,
///         })
///     }
/// }
/// ```
pub fn derive_bcs_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => {
                generate_named_struct_impl(name, &impl_generics, &ty_generics, where_clause, fields)
            }
            Fields::Unnamed(fields) => {
                generate_tuple_struct_impl(name, &impl_generics, &ty_generics, where_clause, fields)
            }
            Fields::Unit => {
                generate_unit_struct_impl(name, &impl_generics, &ty_generics, where_clause)
            }
        },
        Data::Enum(data_enum) => {
            generate_enum_impl(name, &impl_generics, &ty_generics, where_clause, data_enum)
        }
        Data::Union(_) => {
            syn::Error::new_spanned(&input, "BcsCodec derive does not support unions")
                .to_compile_error()
        }
    };

    TokenStream::from(expanded)
}

/// Generates `Encode` and `Decode` for named-field structs.
///
/// Encoding writes each field in declaration order; decoding reads them back
/// in the same order and constructs the struct.
fn generate_named_struct_impl(
    name: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    fields: &syn::FieldsNamed,
) -> proc_macro2::TokenStream {
    let field_names: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();

    let encode_fields = field_names.iter().map(|name| {
        quote! {
            crate::types::bcs::Encode::encode(&self.#name, out)?;
        }
    });

    let decode_fields = field_names.iter().map(|name| {
        quote! {
            #name: crate::types::bcs::Decode::decode(input)?,
        }
    });

    quote! {
        impl #impl_generics crate::types::bcs::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::bcs::EncodeSink>(&self, out: &mut S) -> ::std::result::Result<(), crate::types::bcs::EncodeError> {
                #(#encode_fields)*
                Ok(())
            }
        }

        impl #impl_generics crate::types::bcs::Decode for #name #ty_generics #where_clause {
            fn decode(input: &mut &[u8]) -> ::std::result::Result<Self, crate::types::bcs::DecodeError> {
                Ok(Self {
                    #(#decode_fields)*
                })
            }
        }
    }
}

/// Generates `Encode` and `Decode` for tuple structs.
///
/// Fields are accessed by index: `self.0`, `self.1`. Common for newtype
/// wrappers.
fn generate_tuple_struct_impl(
    name: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    fields: &syn::FieldsUnnamed,
) -> proc_macro2::TokenStream {
    let field_indices: Vec<_> = (0..fields.unnamed.len()).map(syn::Index::from).collect();

    let encode_fields = field_indices.iter().map(|idx| {
        quote! {
            crate::types::bcs::Encode::encode(&self.#idx, out)?;
        }
    });

    let decode_fields = field_indices.iter().map(|_| {
        quote! {
            crate::types::bcs::Decode::decode(input)?,
        }
    });

    quote! {
        impl #impl_generics crate::types::bcs::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::bcs::EncodeSink>(&self, out: &mut S) -> ::std::result::Result<(), crate::types::bcs::EncodeError> {
                #(#encode_fields)*
                Ok(())
            }
        }

        impl #impl_generics crate::types::bcs::Decode for #name #ty_generics #where_clause {
            fn decode(input: &mut &[u8]) -> ::std::result::Result<Self, crate::types::bcs::DecodeError> {
                Ok(Self(
                    #(#decode_fields)*
                ))
            }
        }
    }
}

/// Generates `Encode` and `Decode` for unit structs.
///
/// Encoding writes nothing; decoding just returns `Self`.
fn generate_unit_struct_impl(
    name: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
) -> proc_macro2::TokenStream {
    quote! {
        impl #impl_generics crate::types::bcs::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::bcs::EncodeSink>(&self, _out: &mut S) -> ::std::result::Result<(), crate::types::bcs::EncodeError> {
                Ok(())
            }
        }

        impl #impl_generics crate::types::bcs::Decode for #name #ty_generics #where_clause {
            fn decode(_input: &mut &[u8]) -> ::std::result::Result<Self, crate::types::bcs::DecodeError> {
                Ok(Self)
            }
        }
    }
}

/// Generates `Encode` and `Decode` for enums.
///
/// Enums are encoded as a ULEB128 variant index followed by the variant's
/// fields. Respects explicit discriminant values (e.g., `Variant = 2`), which
/// is how protocol-pinned variant orderings are expressed.
fn generate_enum_impl(
    name: &syn::Ident,
    impl_generics: &syn::ImplGenerics,
    ty_generics: &syn::TypeGenerics,
    where_clause: Option<&syn::WhereClause>,
    data_enum: &DataEnum,
) -> proc_macro2::TokenStream {
    let discriminants: Vec<u32> = compute_variant_indices(data_enum);

    let encode_arms = data_enum.variants.iter().zip(discriminants.iter()).map(|(variant, &idx)| {
        let variant_name = &variant.ident;

        match &variant.fields {
            Fields::Unit => {
                quote! {
                    Self::#variant_name => {
                        crate::types::bcs::encode_variant_index(#idx, out)?;
                    }
                }
            }
            Fields::Unnamed(fields) => {
                let field_names: Vec<_> = (0..fields.unnamed.len())
                    .map(|i| quote::format_ident!("f{}", i))
                    .collect();
                let encode_fields = field_names.iter().map(|f| {
                    quote! { crate::types::bcs::Encode::encode(#f, out)?; }
                });
                quote! {
                    Self::#variant_name(#(#field_names),*) => {
                        crate::types::bcs::encode_variant_index(#idx, out)?;
                        #(#encode_fields)*
                    }
                }
            }
            Fields::Named(fields) => {
                let field_names: Vec<_> = fields.named.iter().map(|f| &f.ident).collect();
                let encode_fields = field_names.iter().map(|f| {
                    quote! { crate::types::bcs::Encode::encode(#f, out)?; }
                });
                quote! {
                    Self::#variant_name { #(#field_names),* } => {
                        crate::types::bcs::encode_variant_index(#idx, out)?;
                        #(#encode_fields)*
                    }
                }
            }
        }
    });

    let decode_arms = data_enum.variants.iter().zip(discriminants.iter()).map(|(variant, &idx)| {
        let variant_name = &variant.ident;

        match &variant.fields {
            Fields::Unit => {
                quote! {
                    #idx => Ok(Self::#variant_name),
                }
            }
            Fields::Unnamed(fields) => {
                let decode_fields = (0..fields.unnamed.len()).map(|_| {
                    quote! { crate::types::bcs::Decode::decode(input)?, }
                });
                quote! {
                    #idx => Ok(Self::#variant_name(#(#decode_fields)*)),
                }
            }
            Fields::Named(fields) => {
                let decode_fields = fields.named.iter().map(|f| {
                    let field_name = &f.ident;
                    quote! { #field_name: crate::types::bcs::Decode::decode(input)?, }
                });
                quote! {
                    #idx => Ok(Self::#variant_name { #(#decode_fields)* }),
                }
            }
        }
    });

    quote! {
        impl #impl_generics crate::types::bcs::Encode for #name #ty_generics #where_clause {
            fn encode<S: crate::types::bcs::EncodeSink>(&self, out: &mut S) -> ::std::result::Result<(), crate::types::bcs::EncodeError> {
                match self {
                    #(#encode_arms)*
                }
                Ok(())
            }
        }

        impl #impl_generics crate::types::bcs::Decode for #name #ty_generics #where_clause {
            fn decode(input: &mut &[u8]) -> ::std::result::Result<Self, crate::types::bcs::DecodeError> {
                let variant_idx: u32 = crate::types::bcs::decode_variant_index(input)?;
                match variant_idx {
                    #(#decode_arms)*
                    _ => Err(crate::types::bcs::DecodeError::InvalidValue),
                }
            }
        }
    }
}

/// Computes the BCS variant index for each enum variant.
///
/// Follows Rust's discriminant rules: an explicit value (e.g., `Variant = 2`)
/// is used as-is, otherwise the index increments from the previous variant,
/// starting at 0.
fn compute_variant_indices(data_enum: &DataEnum) -> Vec<u32> {
    let mut indices = Vec::with_capacity(data_enum.variants.len());
    let mut next_index: u32 = 0;

    for variant in &data_enum.variants {
        let index = if let Some((_, expr)) = &variant.discriminant {
            parse_discriminant_expr(expr)
        } else {
            next_index
        };

        indices.push(index);
        next_index = index.wrapping_add(1);
    }

    indices
}

/// Parses a discriminant expression to extract its u32 value.
///
/// Supports integer literals. Panics on unsupported expressions.
fn parse_discriminant_expr(expr: &syn::Expr) -> u32 {
    match expr {
        syn::Expr::Lit(expr_lit) => match &expr_lit.lit {
            syn::Lit::Int(lit_int) => lit_int
                .base10_parse::<u32>()
                .expect("discriminant must be a valid u32"),
            _ => panic!("discriminant must be an integer literal"),
        },
        _ => panic!("discriminant must be a simple integer literal"),
    }
}
