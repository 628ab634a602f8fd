//! `#[derive(Record)]`: the compile-time replacement for spec.md §4.2's
//! reflective getter/setter discovery. Rust has no runtime reflection, so
//! instead of scanning for `getFoo`/`isFoo`/`setFoo`-shaped methods, this
//! macro reads the struct's own field list at compile time — "strict
//! discovery" realized as "every named field is a property, spelled exactly
//! as the field is named."
//!
//! The annotated struct must also derive `Clone` and `Debug` (the latter is
//! `objectpath::record::RecordObject`'s supertrait).
//!
//! ```ignore
//! #[derive(Clone, Debug, objectpath::Record)]
//! struct Employee {
//!     name: String,
//!     age: i64,
//! }
//! ```

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

#[proc_macro_derive(Record)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(&input, "Record can only be derived for structs with named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Record can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let mut reader_entries = Vec::new();
    let mut writer_entries = Vec::new();

    for field in fields {
        let field_ident = field.ident.as_ref().expect("named field");
        let field_name = field_ident.to_string();
        let shape = FieldShape::classify(&field.ty);

        let declared_type = shape.property_type_tokens();
        let read_body = shape.read_expr(field_ident);
        let write_body = shape.write_expr(field_ident, &field_name, name);

        reader_entries.push(quote! {
            readers.insert(
                #field_name.into(),
                ::objectpath::record::ReadAccessor::new(
                    #field_name,
                    #declared_type,
                    stringify!(#name),
                    |__record: &dyn ::objectpath::record::RecordObject| -> ::objectpath::Value {
                        let __concrete = __record
                            .as_any()
                            .downcast_ref::<#name>()
                            .expect("record_type_id() disagreed with as_any()'s concrete type");
                        #read_body
                    },
                ),
            );
        });

        writer_entries.push(quote! {
            writers.insert(
                #field_name.into(),
                ::objectpath::record::WriteAccessor::new(
                    #field_name,
                    #declared_type,
                    stringify!(#name),
                    |__record: &mut dyn ::objectpath::record::RecordObject, __value: ::objectpath::Value| -> ::std::result::Result<(), ::objectpath::record::AccessError> {
                        let __concrete = __record
                            .as_any_mut()
                            .downcast_mut::<#name>()
                            .expect("record_type_id() disagreed with as_any_mut()'s concrete type");
                        #write_body
                    },
                ),
            );
        });
    }

    let expanded = quote! {
        impl ::objectpath::record::Record for #name {
            fn build_schema() -> ::objectpath::record::RecordSchema {
                let mut readers = ::objectpath::record::IndexMap::new();
                let mut writers = ::objectpath::record::IndexMap::new();
                #(#reader_entries)*
                #(#writer_entries)*
                ::objectpath::record::RecordSchema::new(stringify!(#name), readers, writers)
            }
        }

        impl ::objectpath::record::RecordObject for #name {
            fn record_type_id(&self) -> ::std::any::TypeId {
                ::std::any::TypeId::of::<#name>()
            }

            fn schema(&self) -> ::std::sync::Arc<::objectpath::record::RecordSchema> {
                ::objectpath::record::schema_for::<#name>()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn clone_boxed(&self) -> ::std::boxed::Box<dyn ::objectpath::record::RecordObject> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }
        }
    };

    expanded.into()
}

/// The handful of field shapes this macro recognizes by type name, each
/// wired to the matching [`objectpath::record::PropertyType`] and a direct
/// `Value` conversion — so a type mismatch on write is caught precisely
/// instead of falling back to a blanket `Into`/`TryFrom` bound.
///
/// A field of any other type is treated as a nested record
/// ([`FieldShape::NestedRecord`]): it is boxed into `Value::Record` on read
/// and recovered by downcasting on write, which means the field type must
/// itself implement `Clone` and `objectpath::record::RecordObject` (in
/// practice, carry its own `#[derive(Record)]`).
enum FieldShape {
    Integer,
    Float,
    Boolean,
    Bytes,
    Mapping,
    NestedRecord(Type),
}

impl FieldShape {
    fn classify(ty: &Type) -> Self {
        let Type::Path(path) = ty else {
            return FieldShape::NestedRecord(ty.clone());
        };
        let Some(segment) = path.path.segments.last() else {
            return FieldShape::NestedRecord(ty.clone());
        };
        match segment.ident.to_string().as_str() {
            "i64" | "i32" | "u32" | "usize" | "isize" => FieldShape::Integer,
            "f64" | "f32" => FieldShape::Float,
            "bool" => FieldShape::Boolean,
            "String" => FieldShape::Bytes,
            "Mapping" => FieldShape::Mapping,
            _ => FieldShape::NestedRecord(ty.clone()),
        }
    }

    fn property_type_tokens(&self) -> proc_macro2::TokenStream {
        match self {
            FieldShape::Integer => quote! { ::objectpath::record::PropertyType::Integer },
            FieldShape::Float => quote! { ::objectpath::record::PropertyType::Float },
            FieldShape::Boolean => quote! { ::objectpath::record::PropertyType::Boolean },
            FieldShape::Bytes => quote! { ::objectpath::record::PropertyType::Bytes },
            FieldShape::Mapping => quote! { ::objectpath::record::PropertyType::Mapping },
            FieldShape::NestedRecord(_) => quote! { ::objectpath::record::PropertyType::Any },
        }
    }

    fn read_expr(&self, field: &syn::Ident) -> proc_macro2::TokenStream {
        match self {
            FieldShape::Integer => quote! { ::objectpath::Value::from(__concrete.#field as i64) },
            FieldShape::Float => quote! { ::objectpath::Value::from(__concrete.#field as f64) },
            FieldShape::Boolean => quote! { ::objectpath::Value::from(__concrete.#field) },
            FieldShape::Bytes => quote! { ::objectpath::Value::from(__concrete.#field.clone()) },
            FieldShape::Mapping => quote! { ::objectpath::Value::Mapping(__concrete.#field.clone()) },
            FieldShape::NestedRecord(_) => quote! {
                ::objectpath::Value::Record(::std::boxed::Box::new(__concrete.#field.clone()))
            },
        }
    }

    fn write_expr(&self, field: &syn::Ident, field_name: &str, struct_name: &syn::Ident) -> proc_macro2::TokenStream {
        match self {
            FieldShape::Integer => quote! {
                match __value {
                    ::objectpath::Value::Scalar(::objectpath::Scalar::Integer(__i)) => {
                        __concrete.#field = __i as _;
                        Ok(())
                    }
                    _ => Err(::objectpath::record::AccessError::TypeMismatch {
                        type_name: stringify!(#struct_name),
                        property: #field_name.to_owned(),
                        declared: ::objectpath::record::PropertyType::Integer,
                    }),
                }
            },
            FieldShape::Float => quote! {
                match __value {
                    ::objectpath::Value::Scalar(::objectpath::Scalar::Float(__f)) => {
                        __concrete.#field = __f as _;
                        Ok(())
                    }
                    _ => Err(::objectpath::record::AccessError::TypeMismatch {
                        type_name: stringify!(#struct_name),
                        property: #field_name.to_owned(),
                        declared: ::objectpath::record::PropertyType::Float,
                    }),
                }
            },
            FieldShape::Boolean => quote! {
                match __value {
                    ::objectpath::Value::Scalar(::objectpath::Scalar::Boolean(__b)) => {
                        __concrete.#field = __b;
                        Ok(())
                    }
                    _ => Err(::objectpath::record::AccessError::TypeMismatch {
                        type_name: stringify!(#struct_name),
                        property: #field_name.to_owned(),
                        declared: ::objectpath::record::PropertyType::Boolean,
                    }),
                }
            },
            FieldShape::Bytes => quote! {
                match __value {
                    ::objectpath::Value::Scalar(::objectpath::Scalar::Bytes(__s)) => {
                        __concrete.#field = __s;
                        Ok(())
                    }
                    _ => Err(::objectpath::record::AccessError::TypeMismatch {
                        type_name: stringify!(#struct_name),
                        property: #field_name.to_owned(),
                        declared: ::objectpath::record::PropertyType::Bytes,
                    }),
                }
            },
            FieldShape::Mapping => quote! {
                match __value {
                    ::objectpath::Value::Mapping(__m) => {
                        __concrete.#field = __m;
                        Ok(())
                    }
                    _ => Err(::objectpath::record::AccessError::TypeMismatch {
                        type_name: stringify!(#struct_name),
                        property: #field_name.to_owned(),
                        declared: ::objectpath::record::PropertyType::Mapping,
                    }),
                }
            },
            FieldShape::NestedRecord(ty) => quote! {
                match __value {
                    ::objectpath::Value::Record(__r) => match __r.as_any().downcast_ref::<#ty>() {
                        Some(__typed) => {
                            __concrete.#field = ::std::clone::Clone::clone(__typed);
                            Ok(())
                        }
                        None => Err(::objectpath::record::AccessError::TypeMismatch {
                            type_name: stringify!(#struct_name),
                            property: #field_name.to_owned(),
                            declared: ::objectpath::record::PropertyType::Any,
                        }),
                    },
                    _ => Err(::objectpath::record::AccessError::TypeMismatch {
                        type_name: stringify!(#struct_name),
                        property: #field_name.to_owned(),
                        declared: ::objectpath::record::PropertyType::Any,
                    }),
                }
            },
        }
    }
}
