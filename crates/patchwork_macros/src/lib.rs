use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{
    Attribute, Data, DeriveInput, Expr, Field, Fields, Ident, LitStr, Path, Result, Token, Type,
    meta::ParseNestedMeta, parse_macro_input,
};

/// Derives `patchwork_core::Patchable` for a struct with named fields.
///
/// Field tags default to the field name, adjusted by `rename_all`. The
/// `patch` attribute takes precedence over the matching `serde` one.
#[proc_macro_derive(Patchable, attributes(patch))]
pub fn patchable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_patchable(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_patchable(input: DeriveInput) -> Result<proc_macro2::TokenStream> {
    let ident = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Patchable cannot be derived for generic structs",
        ));
    }

    let container = parse_container_attrs(&input.attrs)?;

    let Data::Struct(data) = input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "Patchable can only be derived for structs",
        ));
    };

    let Fields::Named(fields) = data.fields else {
        return Err(syn::Error::new_spanned(
            ident,
            "Patchable requires named fields",
        ));
    };

    let krate = &container.krate;
    let mut field_decls = Vec::new();
    let mut route_arms = Vec::new();
    let mut direct_tags: Vec<(String, Ident)> = Vec::new();

    for field in fields.named {
        let Some(field_ident) = field.ident.clone() else {
            continue;
        };
        let args = parse_field_attrs(&field)?;
        if args.skip {
            continue;
        }

        let position = proc_macro2::Literal::usize_unsuffixed(field_decls.len());
        let ident_name = unraw(&field_ident);
        let ty = &field.ty;

        if args.flatten {
            if args.tag.is_some() || args.opaque || args.empty_string.is_some() {
                return Err(syn::Error::new_spanned(
                    &field_ident,
                    "flattened fields take no tag, opaque or empty_string options",
                ));
            }
            field_decls.push(quote! {
                #krate::FieldDecl::embedded(#ident_name, <#ty as #krate::Patchable>::record_schema)
            });
            route_arms.push(quote! {
                [#position, rest @ ..] => #krate::Patchable::apply_route(&mut self.#field_ident, rest, value, cx),
            });
            continue;
        }

        let tag = match &args.tag {
            Some(tag) => tag.value(),
            None => container.rename_all.apply(&ident_name),
        };
        if let Some((_, earlier)) = direct_tags.iter().find(|(existing, _)| *existing == tag) {
            return Err(syn::Error::new_spanned(
                &field_ident,
                format!("field tag `{tag}` is already used by `{earlier}`"),
            ));
        }
        direct_tags.push((tag.clone(), field_ident.clone()));

        let type_name = type_label(ty);
        let policy = empty_string_tokens(krate, args.empty_string.as_ref())?;
        field_decls.push(quote! {
            #krate::FieldDecl::value(#ident_name, #tag, #type_name, #policy)
        });

        let assign = if args.opaque {
            quote! { #krate::coerce::assign_opaque(&mut self.#field_ident, value, cx) }
        } else {
            quote! { #krate::coerce::assign(&mut self.#field_ident, value, cx) }
        };
        route_arms.push(quote! {
            [#position] => #assign,
        });
    }

    let record_name = ident.to_string();
    let unused = route_arms
        .is_empty()
        .then(|| quote! { let _ = (value, cx); });

    Ok(quote! {
        impl #krate::Patchable for #ident {
            fn record_schema() -> &'static #krate::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<#krate::RecordSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    #krate::RecordSchema::new(#record_name, ::std::vec![#(#field_decls),*])
                })
            }

            fn schema(&self) -> &'static #krate::RecordSchema {
                <Self as #krate::Patchable>::record_schema()
            }

            fn apply_route(
                &mut self,
                route: &[usize],
                value: &#krate::Value,
                cx: &#krate::FieldCx<'_>,
            ) -> ::std::result::Result<(), #krate::ApplyError> {
                #unused
                match route {
                    #(#route_arms)*
                    _ => ::std::result::Result::Err(#krate::ApplyError::InvalidTarget {
                        record: #record_name,
                        reason: ::std::format!("no field at route {:?}", route),
                    }),
                }
            }
        }
    })
}

struct ContainerArgs {
    krate: Path,
    rename_all: RenameRule,
}

fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerArgs> {
    let mut krate = None::<Path>;
    let mut patch_rename = None::<RenameRule>;
    let mut serde_rename = None::<RenameRule>;

    for attr in attrs {
        if attr.path().is_ident("patch") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let value: LitStr = meta.value()?.parse()?;
                    patch_rename = Some(RenameRule::parse(&value)?);
                    return Ok(());
                }
                if meta.path.is_ident("crate") {
                    let value: LitStr = meta.value()?.parse()?;
                    krate = Some(value.parse()?);
                    return Ok(());
                }
                Err(meta.error("unsupported patch container attribute"))
            })?;
        }

        if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") && meta.input.peek(Token![=]) {
                    let value: LitStr = meta.value()?.parse()?;
                    serde_rename = Some(RenameRule::parse(&value)?);
                    return Ok(());
                }
                skip_meta(&meta)
            })?;
        }
    }

    Ok(ContainerArgs {
        krate: krate.unwrap_or_else(|| syn::parse_quote!(::patchwork_core)),
        rename_all: patch_rename.or(serde_rename).unwrap_or(RenameRule::None),
    })
}

#[derive(Default)]
struct FieldArgs {
    tag: Option<LitStr>,
    flatten: bool,
    skip: bool,
    opaque: bool,
    empty_string: Option<LitStr>,
}

fn parse_field_attrs(field: &Field) -> Result<FieldArgs> {
    let mut args = FieldArgs::default();
    let mut serde_tag = None::<LitStr>;
    let mut serde_flatten = false;
    let mut serde_skip = false;
    let mut patch_flatten = None::<bool>;
    let mut patch_skip = None::<bool>;

    for attr in &field.attrs {
        if attr.path().is_ident("patch") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("tag") || meta.path.is_ident("rename") {
                    args.tag = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if meta.path.is_ident("flatten") {
                    patch_flatten = Some(true);
                    return Ok(());
                }
                if meta.path.is_ident("skip") {
                    patch_skip = Some(true);
                    return Ok(());
                }
                if meta.path.is_ident("opaque") {
                    args.opaque = true;
                    return Ok(());
                }
                if meta.path.is_ident("empty_string") {
                    args.empty_string = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                Err(meta.error("unsupported patch field attribute"))
            })?;
        }

        if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                    serde_tag = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if meta.path.is_ident("flatten") {
                    serde_flatten = true;
                    return Ok(());
                }
                if meta.path.is_ident("skip") {
                    serde_skip = true;
                    return Ok(());
                }
                skip_meta(&meta)
            })?;
        }
    }

    if args.tag.is_none() {
        args.tag = serde_tag;
    }
    args.flatten = patch_flatten.unwrap_or(serde_flatten);
    args.skip = patch_skip.unwrap_or(serde_skip);
    Ok(args)
}

// Consumes serde options this derive does not care about.
fn skip_meta(meta: &ParseNestedMeta<'_>) -> Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_meta(&nested))?;
    }
    Ok(())
}

fn empty_string_tokens(krate: &Path, policy: Option<&LitStr>) -> Result<proc_macro2::TokenStream> {
    let Some(policy) = policy else {
        return Ok(quote! { #krate::EmptyStringPolicy::Inherit });
    };
    match policy.value().as_str() {
        "none" => Ok(quote! { #krate::EmptyStringPolicy::AsNone }),
        "keep" => Ok(quote! { #krate::EmptyStringPolicy::Keep }),
        _ => Err(syn::Error::new_spanned(
            policy,
            "empty_string must be \"none\" or \"keep\"",
        )),
    }
}

fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();
    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

fn type_label(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RenameRule {
    None,
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(value: &LitStr) -> Result<Self> {
        let rule = match value.value().as_str() {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "PascalCase" => RenameRule::Pascal,
            "camelCase" => RenameRule::Camel,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebab,
            _ => {
                return Err(syn::Error::new_spanned(value, "unknown rename_all rule"));
            }
        };
        Ok(rule)
    }

    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::None => field.to_string(),
            RenameRule::Lower => field.to_lowercase(),
            RenameRule::Upper => field.to_uppercase(),
            RenameRule::Pascal => field.to_upper_camel_case(),
            RenameRule::Camel => field.to_lower_camel_case(),
            RenameRule::Snake => field.to_snake_case(),
            RenameRule::ScreamingSnake => field.to_shouty_snake_case(),
            RenameRule::Kebab => field.to_kebab_case(),
            RenameRule::ScreamingKebab => field.to_shouty_kebab_case(),
        }
    }
}
