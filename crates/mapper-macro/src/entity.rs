use proc_macro2::{TokenStream, TokenTree};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Fields, GenericArgument, LitStr, PathArguments, Type};

/// Types that map to a scalar node without an explicit `#[entity(scalar)]`.
const SCALAR_TYPES: &[&str] = &[
    "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64", "String", "str",
];

pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "Entity can only be derived for structs with named fields",
            ));
        }
    };

    let container = ContainerAttrs::parse(&input.attrs)?;
    let type_name = container
        .name
        .unwrap_or_else(|| LitStr::new(&ident.unraw().to_string(), ident.span()));
    let root_key = container.root.map(|root| quote!(.root_key(#root)));

    let mut descriptors = Vec::new();
    let mut dependencies = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::parse(&field.attrs)?;
        if attrs.skip {
            // Serde would still write and expect the field, and the mapper
            // rejects fields its descriptor does not declare.
            if !serde_skips(&field.attrs) {
                return Err(Error::new_spanned(
                    &field.ty,
                    "`#[entity(skip)]` must be paired with `#[serde(skip)]`",
                ));
            }
            continue;
        }
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let declared_name = field_ident.unraw().to_string();

        let shape = Shape::classify(&field.ty, attrs.scalar);
        if let Some(entity_ty) = shape.element().entity_type() {
            dependencies.push(entity_ty.clone());
        }

        let mut descriptor = match &shape {
            Shape::Single(ValueKind::Scalar) => quote! {
                ::rev_mapper::FieldDescriptor::scalar(#declared_name)
            },
            Shape::Single(ValueKind::Entity(ty)) => quote! {
                ::rev_mapper::FieldDescriptor::entity(
                    #declared_name,
                    <#ty as ::rev_mapper::Entity>::TYPE_NAME,
                )
            },
            Shape::Sequence(element) => {
                let element = element.tokens();
                let wrapping = match attrs.wrapping {
                    Some(WrappingAttr::Implicit) => quote!(::rev_mapper::Wrapping::Implicit),
                    Some(WrappingAttr::Explicit) | None => {
                        quote!(::rev_mapper::Wrapping::Explicit)
                    }
                };
                quote! {
                    ::rev_mapper::FieldDescriptor::sequence(#declared_name, #element, #wrapping)
                }
            }
        };

        if attrs.wrapping.is_some() && !matches!(shape, Shape::Sequence(_)) {
            return Err(Error::new_spanned(
                field_ident,
                "`implicit`/`explicit` only apply to `Vec` fields",
            ));
        }
        if let Some(rename) = &attrs.rename {
            descriptor = quote!(#descriptor.rename(#rename));
        }
        if attrs.required {
            descriptor = quote!(#descriptor.required());
        }
        descriptors.push(descriptor);
    }

    Ok(quote! {
        impl #impl_generics ::rev_mapper::Entity for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn descriptor() -> ::rev_mapper::TypeDescriptor {
                ::rev_mapper::TypeDescriptor::new(Self::TYPE_NAME)
                    #root_key
                    #(.field(#descriptors))*
            }

            fn register(builder: &mut ::rev_mapper::RegistryBuilder) {
                // Self-referencing types would otherwise recurse forever.
                if builder.contains(Self::TYPE_NAME) {
                    return;
                }
                builder.add(Self::descriptor());
                #(<#dependencies as ::rev_mapper::Entity>::register(builder);)*
            }
        }
    })
}

/// Whether serde leaves the field out in both directions.
fn serde_skips(attrs: &[Attribute]) -> bool {
    let mut serializing = false;
    let mut deserializing = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let Ok(list) = attr.meta.require_list() else {
            continue;
        };
        for token in list.tokens.clone() {
            if let TokenTree::Ident(ident) = token {
                if ident == "skip" {
                    return true;
                }
                serializing |= ident == "skip_serializing";
                deserializing |= ident == "skip_deserializing";
            }
        }
    }
    serializing && deserializing
}

///
/// ContainerAttrs
///

#[derive(Default)]
struct ContainerAttrs {
    name: Option<LitStr>,
    root: Option<LitStr>,
}

impl ContainerAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("entity")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    parsed.name = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("root") {
                    parsed.root = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("expected `name` or `root`"));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }
}

///
/// FieldAttrs
///

#[derive(Clone, Copy, PartialEq)]
enum WrappingAttr {
    Explicit,
    Implicit,
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<LitStr>,
    required: bool,
    wrapping: Option<WrappingAttr>,
    scalar: bool,
    skip: bool,
}

impl FieldAttrs {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("entity")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    parsed.rename = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("required") {
                    parsed.required = true;
                } else if meta.path.is_ident("implicit") {
                    parsed.set_wrapping(WrappingAttr::Implicit, &meta)?;
                } else if meta.path.is_ident("explicit") {
                    parsed.set_wrapping(WrappingAttr::Explicit, &meta)?;
                } else if meta.path.is_ident("scalar") {
                    parsed.scalar = true;
                } else if meta.path.is_ident("skip") {
                    parsed.skip = true;
                } else {
                    return Err(meta.error(
                        "expected one of `rename`, `required`, `implicit`, `explicit`, `scalar`, `skip`",
                    ));
                }
                Ok(())
            })?;
        }
        Ok(parsed)
    }

    fn set_wrapping(
        &mut self,
        wrapping: WrappingAttr,
        meta: &syn::meta::ParseNestedMeta<'_>,
    ) -> syn::Result<()> {
        match self.wrapping {
            Some(existing) if existing != wrapping => {
                Err(meta.error("`implicit` and `explicit` are mutually exclusive"))
            }
            _ => {
                self.wrapping = Some(wrapping);
                Ok(())
            }
        }
    }
}

///
/// Shape
///

enum ValueKind {
    Scalar,
    Entity(Type),
}

impl ValueKind {
    fn of(ty: &Type, force_scalar: bool) -> Self {
        if force_scalar || is_scalar(ty) {
            ValueKind::Scalar
        } else {
            ValueKind::Entity(ty.clone())
        }
    }

    fn entity_type(&self) -> Option<&Type> {
        match self {
            ValueKind::Scalar => None,
            ValueKind::Entity(ty) => Some(ty),
        }
    }

    fn tokens(&self) -> TokenStream {
        match self {
            ValueKind::Scalar => quote!(::rev_mapper::ElementKind::Scalar),
            ValueKind::Entity(ty) => quote! {
                ::rev_mapper::ElementKind::Entity(<#ty as ::rev_mapper::Entity>::TYPE_NAME)
            },
        }
    }
}

enum Shape {
    Single(ValueKind),
    Sequence(ValueKind),
}

impl Shape {
    /// `Option` is transparent; `Vec` (optionally inside `Option`) is a sequence.
    fn classify(ty: &Type, force_scalar: bool) -> Self {
        let ty = generic_argument(ty, "Option").unwrap_or(ty);
        match generic_argument(ty, "Vec") {
            Some(element) => Shape::Sequence(ValueKind::of(element, force_scalar)),
            None => Shape::Single(ValueKind::of(ty, force_scalar)),
        }
    }

    fn element(&self) -> &ValueKind {
        match self {
            Shape::Single(kind) | Shape::Sequence(kind) => kind,
        }
    }
}

/// The first type argument of `ty` when its last path segment is `wrapper`.
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn is_scalar(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => is_scalar(&reference.elem),
        Type::Path(path) if path.qself.is_none() => {
            path.path.segments.last().is_some_and(|segment| {
                segment.arguments.is_none() && SCALAR_TYPES.iter().any(|name| segment.ident == *name)
            })
        }
        _ => false,
    }
}
