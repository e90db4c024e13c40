mod surface;

use proc_macro::TokenStream;

/// Derive `EventSurface` for a type from the `on*` methods of an inherent impl block.
///
/// The impl block is emitted unchanged. Every method whose name starts with `on`
/// (case-insensitive) and takes at most one argument besides the receiver is reported
/// as an event name, in declaration order.
#[proc_macro_attribute]
pub fn event_surface(attr: TokenStream, item: TokenStream) -> TokenStream {
    surface::event_surface(attr, item)
}
