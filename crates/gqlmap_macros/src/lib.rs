//! Derive macros for gqlmap.
//!
//! Generates compile-time field descriptors so the selection and input
//! encoders never inspect types at runtime.
//!
//! # Example
//!
//! ```ignore
//! use gqlmap_core::{Shape, ToInput};
//!
//! #[derive(Shape, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Dog {
//!     id: String,
//!     breed_name: String,
//!     #[gql(rename = "owner")]
//!     owned_by: Option<Owner>,
//! }
//!
//! #[derive(ToInput)]
//! enum Color {
//!     #[gql(rename = "RED")]
//!     Red,
//!     Blue,
//! }
//! ```
//!
//! Field names are resolved in this order: `#[gql(rename = "..")]`,
//! `#[serde(rename = "..")]`, the container's `rename_all` rule (from `gql` or
//! `serde`), then the identifier itself. Fields marked `#[gql(skip)]` or
//! skipped by serde are left out.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Fields, Generics,
    LitStr,
};

/// Derive macro for `gqlmap_core::Shape`.
///
/// Structs with named fields become records, newtype structs take the shape of
/// their inner type, and unit-only enums are leaves.
#[proc_macro_derive(Shape, attributes(gql))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input, Target::Shape)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive macro for `gqlmap_core::ToInput`.
///
/// Structs with named fields become records, newtype structs encode as their
/// inner value, and unit-only enums encode as bare enum values.
#[proc_macro_derive(ToInput, attributes(gql))]
pub fn derive_to_input(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input, Target::ToInput)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Target {
    Shape,
    ToInput,
}

fn expand(input: &DeriveInput, target: Target) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let bound = match target {
        Target::Shape => quote!(::gqlmap_core::Shape),
        Target::ToInput => quote!(::gqlmap_core::ToInput),
    };
    let generics = with_bound(input.generics.clone(), &bound);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let container = ContainerAttrs::parse(&input.attrs)?;

    let body = match &input.data {
        Data::Struct(data) => expand_struct(&data.fields, &container, target)?,
        Data::Enum(data) => expand_enum(data, &container, target)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "unions cannot be mapped to GraphQL",
            ))
        }
    };

    Ok(match target {
        Target::Shape => quote! {
            impl #impl_generics ::gqlmap_core::Shape for #name #ty_generics #where_clause {
                fn describe() -> ::gqlmap_core::ShapeDescriptor {
                    #body
                }
            }
        },
        Target::ToInput => quote! {
            impl #impl_generics ::gqlmap_core::ToInput for #name #ty_generics #where_clause {
                fn to_input(&self) -> ::gqlmap_core::InputValue {
                    #body
                }
            }
        },
    })
}

fn with_bound(mut generics: Generics, bound: &TokenStream2) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#bound));
    }
    generics
}

fn expand_struct(
    fields: &Fields,
    container: &ContainerAttrs,
    target: Target,
) -> syn::Result<TokenStream2> {
    match fields {
        Fields::Named(named) => {
            let mut entries = Vec::new();
            for field in &named.named {
                let attrs = FieldAttrs::parse(&field.attrs)?;
                if attrs.skipped(target) {
                    continue;
                }
                let Some(ident) = &field.ident else {
                    continue;
                };
                let wire = attrs
                    .name(target)
                    .unwrap_or_else(|| container.rename_field(&ident.unraw().to_string()));
                let ty = &field.ty;

                entries.push(match target {
                    Target::Shape => quote! {
                        ::gqlmap_core::FieldDescriptor::of::<#ty>(#wire)
                    },
                    Target::ToInput => quote! {
                        (#wire, ::gqlmap_core::ToInput::to_input(&self.#ident))
                    },
                });
            }

            Ok(match target {
                Target::Shape => quote! {
                    ::gqlmap_core::ShapeDescriptor::Record(::std::vec![#(#entries),*])
                },
                Target::ToInput => quote! {
                    ::gqlmap_core::InputValue::Record(::std::vec![#(#entries),*])
                },
            })
        }
        // Newtypes are transparent.
        Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            let ty = &unnamed.unnamed[0].ty;
            Ok(match target {
                Target::Shape => quote! {
                    <#ty as ::gqlmap_core::Shape>::describe()
                },
                Target::ToInput => quote! {
                    ::gqlmap_core::ToInput::to_input(&self.0)
                },
            })
        }
        Fields::Unnamed(unnamed) => Err(syn::Error::new_spanned(
            unnamed,
            "tuple structs with more than one field have no field names",
        )),
        Fields::Unit => Ok(match target {
            Target::Shape => quote! {
                ::gqlmap_core::ShapeDescriptor::Record(::std::vec::Vec::new())
            },
            Target::ToInput => quote! {
                ::gqlmap_core::InputValue::Record(::std::vec::Vec::new())
            },
        }),
    }
}

fn expand_enum(
    data: &DataEnum,
    container: &ContainerAttrs,
    target: Target,
) -> syn::Result<TokenStream2> {
    let mut arms = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "only enums with unit variants map to GraphQL enums",
            ));
        }
        let attrs = FieldAttrs::parse(&variant.attrs)?;
        let ident = &variant.ident;
        let wire = attrs
            .name(target)
            .unwrap_or_else(|| container.rename_variant(&ident.unraw().to_string()));
        arms.push(quote! {
            Self::#ident => ::gqlmap_core::InputValue::Enum(#wire),
        });
    }

    Ok(match target {
        Target::Shape => quote! { ::gqlmap_core::ShapeDescriptor::Leaf },
        Target::ToInput => quote! {
            match *self {
                #(#arms)*
            }
        },
    })
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Default)]
struct ContainerAttrs {
    rename_all: Option<RenameRule>,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut gql_rule = None;
        let mut serde_rule = None;

        for attr in attrs {
            if attr.path().is_ident("gql") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        gql_rule = Some(RenameRule::parse(&meta.value()?.parse()?)?);
                        Ok(())
                    } else {
                        Err(meta.error("unsupported gql container attribute"))
                    }
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
                        serde_rule = Some(RenameRule::parse(&meta.value()?.parse()?)?);
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            }
        }

        Ok(Self {
            rename_all: gql_rule.or(serde_rule),
        })
    }

    fn rename_field(&self, name: &str) -> String {
        self.rename_all
            .map_or_else(|| name.to_string(), |rule| rule.apply_to_field(name))
    }

    fn rename_variant(&self, name: &str) -> String {
        self.rename_all
            .map_or_else(|| name.to_string(), |rule| rule.apply_to_variant(name))
    }
}

#[derive(Default)]
struct FieldAttrs {
    gql_rename: Option<String>,
    gql_skip: bool,
    serde_rename: Option<String>,
    serde_rename_serialize: Option<String>,
    serde_rename_deserialize: Option<String>,
    serde_skip_serializing: bool,
    serde_skip_deserializing: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in attrs {
            if attr.path().is_ident("gql") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        let value: LitStr = meta.value()?.parse()?;
                        out.gql_rename = Some(value.value());
                        Ok(())
                    } else if meta.path.is_ident("skip") {
                        out.gql_skip = true;
                        Ok(())
                    } else {
                        Err(meta.error("unsupported gql field attribute"))
                    }
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        if meta.input.peek(syn::Token![=]) {
                            let value: LitStr = meta.value()?.parse()?;
                            out.serde_rename = Some(value.value());
                        } else {
                            meta.parse_nested_meta(|inner| {
                                let value: LitStr = inner.value()?.parse()?;
                                if inner.path.is_ident("serialize") {
                                    out.serde_rename_serialize = Some(value.value());
                                } else if inner.path.is_ident("deserialize") {
                                    out.serde_rename_deserialize = Some(value.value());
                                }
                                Ok(())
                            })?;
                        }
                        Ok(())
                    } else if meta.path.is_ident("skip") {
                        out.serde_skip_serializing = true;
                        out.serde_skip_deserializing = true;
                        Ok(())
                    } else if meta.path.is_ident("skip_serializing") {
                        out.serde_skip_serializing = true;
                        Ok(())
                    } else if meta.path.is_ident("skip_deserializing") {
                        out.serde_skip_deserializing = true;
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            }
        }

        Ok(out)
    }

    /// Selections mirror what is deserialized, inputs what is serialized.
    fn skipped(&self, target: Target) -> bool {
        self.gql_skip
            || match target {
                Target::Shape => self.serde_skip_deserializing,
                Target::ToInput => self.serde_skip_serializing,
            }
    }

    fn name(&self, target: Target) -> Option<String> {
        let directional = match target {
            Target::Shape => &self.serde_rename_deserialize,
            Target::ToInput => &self.serde_rename_serialize,
        };
        self.gql_rename
            .clone()
            .or_else(|| self.serde_rename.clone())
            .or_else(|| directional.clone())
    }
}

/// Consumes a serde attribute we do not interpret.
fn skip_meta(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unsupported rename rule `{other}`"),
                ))
            }
        })
    }

    /// Renames a `snake_case` field identifier.
    fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_string(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => {
                let mut out = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        out.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
            Self::Camel => lower_first(&Self::Pascal.apply_to_field(field)),
        }
    }

    /// Renames a `PascalCase` variant identifier.
    fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::Pascal => variant.to_string(),
            Self::Lower => variant.to_ascii_lowercase(),
            Self::Upper => variant.to_ascii_uppercase(),
            Self::Camel => lower_first(variant),
            Self::Snake => {
                let mut out = String::with_capacity(variant.len() + 4);
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        out.push('_');
                    }
                    out.push(ch.to_ascii_lowercase());
                }
                out
            }
            Self::ScreamingSnake => Self::Snake.apply_to_variant(variant).to_ascii_uppercase(),
        }
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
