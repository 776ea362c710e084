//! Parsing logic for `#[kernel]` arguments and `register_kernels!` tables.

use syn::{
    Ident, LitStr, Path, Token, bracketed,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

/// Arguments to the kernel attribute
pub(crate) struct KernelArgs {
    pub(crate) name: LitStr,
    pub(crate) key: Option<LitStr>,
}

/// Individual argument parsed from the attribute
enum KernelArg {
    Name(LitStr),
    Key(LitStr),
}

impl Parse for KernelArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ident: Ident = input.parse()?;
        match ident.to_string().as_str() {
            "name" => {
                input.parse::<Token![=]>()?;
                Ok(KernelArg::Name(input.parse()?))
            }
            "key" => {
                input.parse::<Token![=]>()?;
                Ok(KernelArg::Key(input.parse()?))
            }
            other => Err(syn::Error::new(
                ident.span(),
                format!("unknown argument: {}", other),
            )),
        }
    }
}

impl Parse for KernelArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut key = None;

        let args = Punctuated::<KernelArg, Token![,]>::parse_terminated(input)?;
        for arg in args {
            match arg {
                KernelArg::Name(n) => name = Some(n),
                KernelArg::Key(k) => key = Some(k),
            }
        }

        let name = name.ok_or_else(|| input.error("missing `name = \"...\"` argument"))?;
        Ok(KernelArgs { name, key })
    }
}

/// One row of a `register_kernels!` table:
/// `"op" => path` or `"op" [key = "..."] => path`.
pub(crate) struct TableEntry {
    pub(crate) operator: LitStr,
    pub(crate) key: Option<LitStr>,
    pub(crate) function: Path,
}

impl Parse for TableEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let operator: LitStr = input.parse()?;

        let key = if input.peek(syn::token::Bracket) {
            let content;
            bracketed!(content in input);
            match content.parse::<KernelArg>()? {
                KernelArg::Key(key) => Some(key),
                KernelArg::Name(name) => {
                    return Err(syn::Error::new_spanned(
                        name,
                        "only `key = \"...\"` is accepted here",
                    ));
                }
            }
        } else {
            None
        };

        input.parse::<Token![=>]>()?;
        let function: Path = input.parse()?;

        Ok(TableEntry {
            operator,
            key,
            function,
        })
    }
}

/// Full `register_kernels!` input: leading `use module;` items, then entries.
pub(crate) struct KernelTable {
    pub(crate) imports: Vec<Path>,
    pub(crate) entries: Vec<TableEntry>,
}

impl Parse for KernelTable {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut imports = Vec::new();
        while input.peek(Token![use]) {
            input.parse::<Token![use]>()?;
            imports.push(input.parse::<Path>()?);
            input.parse::<Token![;]>()?;
        }

        let entries = Punctuated::<TableEntry, Token![,]>::parse_terminated(input)?;
        Ok(KernelTable {
            imports,
            entries: entries.into_iter().collect(),
        })
    }
}
