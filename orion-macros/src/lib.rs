use proc_macro::TokenStream;

mod views;

/// Embeds every template matching a glob pattern into a `MemorySource`.
///
/// The pattern is resolved against `CARGO_MANIFEST_DIR`. Each file is keyed by
/// its path relative to the literal (non-glob) prefix of the pattern, so
/// `embed_views!("views/**/*.orion.php")` makes `views/layouts/app.orion.php`
/// available as the view `layouts.app`.
///
/// ```ignore
/// let source = orion::embed_views!("views/**/*.orion.php");
/// let engine = Orion::new(OrionOptions::new()).with_source(source);
/// ```
#[proc_macro]
pub fn embed_views(input: TokenStream) -> TokenStream {
    views::embed_views_impl(input)
}
