use proc_macro::TokenStream;
use quote::quote;
use std::env;
use std::path::{Path, PathBuf};
use syn::{LitStr, parse_macro_input};

pub fn embed_views_impl(input: TokenStream) -> TokenStream {
    let pattern = parse_macro_input!(input as LitStr);
    let pattern_str = pattern.value();

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => {
            return syn::Error::new(pattern.span(), "CARGO_MANIFEST_DIR is not set")
                .to_compile_error()
                .into();
        }
    };
    let root = PathBuf::from(manifest_dir);
    let base = root.join(literal_prefix(&pattern_str));
    let full_pattern = root.join(&pattern_str);

    let files: Vec<PathBuf> = match glob::glob(&full_pattern.to_string_lossy()) {
        Ok(paths) => paths
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => {
            return syn::Error::new(pattern.span(), format!("invalid glob pattern: {}", e))
                .to_compile_error()
                .into();
        }
    };

    let assets: Vec<_> = files
        .iter()
        .map(|file| {
            let abs = file.to_string_lossy().to_string();
            let rel = relative_key(file, &base);
            quote! {
                (#rel, include_str!(#abs))
            }
        })
        .collect();

    let output = quote! {
        ::orion::source::MemorySource::from_assets([
            #(#assets),*
        ])
    };

    output.into()
}

/// The directory part of the pattern before the first glob metacharacter.
fn literal_prefix(pattern: &str) -> &str {
    let first_meta = pattern
        .find(|c| matches!(c, '*' | '?' | '[' | '{'))
        .unwrap_or(pattern.len());
    match pattern[..first_meta].rfind('/') {
        Some(slash) => &pattern[..slash],
        None => "",
    }
}

fn relative_key(file: &Path, base: &Path) -> String {
    let rel = file.strip_prefix(base).unwrap_or(file);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_prefix() {
        assert_eq!(literal_prefix("tests/views/**/*.orion.php"), "tests/views");
        assert_eq!(literal_prefix("*.orion.php"), "");
        assert_eq!(literal_prefix("views/home.orion.php"), "views");
    }

    #[test]
    fn test_relative_key() {
        let base = Path::new("/srv/app/views");
        let file = Path::new("/srv/app/views/layouts/app.orion.php");
        assert_eq!(relative_key(file, base), "layouts/app.orion.php");
    }
}
