//! Derive macro for galaxy parameter sets.
//!
//! `#[derive(Parameters)]` turns a plain struct of tweakable values into a
//! [`ParameterSet`](galaxy::ParameterSet): every field carries its declared
//! range and step, and the macro generates the metadata table, range/step
//! snapping, and (with the `egui` feature) one panel widget per field.
//!
//! # Usage
//!
//! The macro is re-exported from the main `galaxy` crate:
//!
//! ```ignore
//! use galaxy::prelude::*;
//!
//! #[derive(Parameters, Clone)]
//! struct Ring {
//!     #[param(min = 100, max = 10_000, step = 100)]
//!     count: u32,
//!     #[param(min = 0.5, max = 5.0, step = 0.1)]
//!     radius: f32,
//!     #[param(color, label = "tint")]
//!     color: Rgb,
//! }
//! ```
//!
//! # Supported Fields
//!
//! | Rust Type | Attribute | Widget |
//! |-----------|-----------|--------|
//! | `f32` | `#[param(min, max, step)]` | slider |
//! | `u32` | `#[param(min, max, step)]` | integer slider |
//! | `Rgb` | `#[param(color)]` | colour picker |
//!
//! An optional `label = "..."` overrides the field name shown in the panel.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Fields, Lit, LitStr, Type, UnOp};

/// What the `#[param(...)]` attribute declared for one field.
#[derive(Default)]
struct ParamAttr {
    min: Option<f64>,
    max: Option<f64>,
    step: Option<f64>,
    color: bool,
    label: Option<String>,
}

/// Evaluate a numeric literal, optionally negated.
fn eval_number(expr: &Expr) -> syn::Result<f64> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(i) => i.base10_parse::<f64>(),
            Lit::Float(f) => f.base10_parse::<f64>(),
            other => Err(syn::Error::new_spanned(other, "expected a numeric literal")),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => Ok(-eval_number(&unary.expr)?),
        other => Err(syn::Error::new_spanned(other, "expected a numeric literal")),
    }
}

fn parse_param_attr(attrs: &[syn::Attribute]) -> syn::Result<Option<ParamAttr>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("param")) else {
        return Ok(None);
    };

    let mut parsed = ParamAttr::default();
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("color") {
            parsed.color = true;
            return Ok(());
        }
        if meta.path.is_ident("label") {
            let lit: LitStr = meta.value()?.parse()?;
            parsed.label = Some(lit.value());
            return Ok(());
        }

        let value = eval_number(&meta.value()?.parse::<Expr>()?)?;
        if meta.path.is_ident("min") {
            parsed.min = Some(value);
        } else if meta.path.is_ident("max") {
            parsed.max = Some(value);
        } else if meta.path.is_ident("step") {
            parsed.step = Some(value);
        } else {
            return Err(meta.error("unknown param key, expected min, max, step, color or label"));
        }
        Ok(())
    })?;

    Ok(Some(parsed))
}

/// Derive macro for tweakable parameter structs.
///
/// Generates an implementation of `galaxy::ParameterSet` containing:
///
/// - `FIELDS`: one `ParamSpec` per field, in declaration order
/// - `clamp_to_ranges()`: snaps numeric fields onto their step grid and range
/// - `render_controls()` (feature `egui`): one widget per field, aggregated
///   into a `ControlResponse`
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to an enum or a tuple struct
/// - A field has no `#[param(...)]` attribute
/// - A numeric field is missing `min`, `max` or `step`
/// - A field type is not `f32`, `u32` or a `#[param(color)]` field
#[proc_macro_derive(Parameters, attributes(param))]
pub fn derive_parameters(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Parameters derive only supports structs with named fields"),
        },
        _ => panic!("Parameters derive only supports structs"),
    };

    let mut specs = Vec::new();
    let mut clamps = Vec::new();
    let mut widgets = Vec::new();

    for field in fields {
        let ident = field.ident.as_ref().expect("named field");
        let field_name = ident.to_string();

        let attr = match parse_param_attr(&field.attrs) {
            Ok(Some(attr)) => attr,
            Ok(None) => panic!("field '{}' needs a #[param(...)] attribute", field_name),
            Err(err) => return err.to_compile_error().into(),
        };
        let label = attr.label.clone().unwrap_or_else(|| field_name.clone());

        if attr.color {
            specs.push(quote! {
                galaxy::ParamSpec {
                    name: #field_name,
                    label: #label,
                    kind: galaxy::ParamKind::Color,
                }
            });
            widgets.push(quote! {
                response.absorb(&galaxy::controls::color_picker(ui, #label, &mut self.#ident));
            });
            continue;
        }

        let (min, max, step) = match (attr.min, attr.max, attr.step) {
            (Some(min), Some(max), Some(step)) => (min, max, step),
            _ => panic!("numeric field '{}' needs min, max and step", field_name),
        };

        match scalar_kind(&field.ty) {
            Some("f32") => {
                let (min, max, step) = (min as f32, max as f32, step as f32);
                specs.push(quote! {
                    galaxy::ParamSpec {
                        name: #field_name,
                        label: #label,
                        kind: galaxy::ParamKind::Float { min: #min, max: #max, step: #step },
                    }
                });
                clamps.push(quote! {
                    self.#ident = galaxy::params::snap_f32(self.#ident, #min, #max, #step);
                });
                widgets.push(quote! {
                    response.absorb(&galaxy::controls::f32_slider(ui, #label, &mut self.#ident, #min, #max, #step));
                });
            }
            Some("u32") => {
                let (min, max, step) = (min as u32, max as u32, step as u32);
                specs.push(quote! {
                    galaxy::ParamSpec {
                        name: #field_name,
                        label: #label,
                        kind: galaxy::ParamKind::Integer { min: #min, max: #max, step: #step },
                    }
                });
                clamps.push(quote! {
                    self.#ident = galaxy::params::snap_u32(self.#ident, #min, #max, #step);
                });
                widgets.push(quote! {
                    response.absorb(&galaxy::controls::u32_slider(ui, #label, &mut self.#ident, #min, #max, #step));
                });
            }
            _ => panic!(
                "field '{}' has an unsupported type; use f32, u32 or mark a colour with #[param(color)]",
                field_name
            ),
        }
    }

    let expanded = quote! {
        impl galaxy::ParameterSet for #name {
            const FIELDS: &'static [galaxy::ParamSpec] = &[
                #(#specs),*
            ];

            fn clamp_to_ranges(&mut self) {
                #(#clamps)*
            }

            #[cfg(feature = "egui")]
            fn render_controls(&mut self, ui: &mut galaxy::egui::Ui) -> galaxy::ControlResponse {
                let mut response = galaxy::ControlResponse::default();
                #(#widgets)*
                response
            }
        }
    };

    TokenStream::from(expanded)
}

fn scalar_kind(ty: &Type) -> Option<&'static str> {
    let type_str = quote!(#ty).to_string().replace(' ', "");
    match type_str.as_str() {
        "f32" => Some("f32"),
        "u32" => Some("u32"),
        _ => None,
    }
}
