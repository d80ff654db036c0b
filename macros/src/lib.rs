use proc_macro::TokenStream;

mod twi_codec;

/// Generates the implementation block for conforming to `SerializeIter` of the TWI flavor.
///
/// Structs serialize their fields in declaration order. Enums must carry a
/// `#[repr(...)]` and serialize as their discriminant followed by the
/// variant's fields, which is how sub-command enums map onto byte 1 of a
/// frame.
///
/// # Note
///
/// Requires `twi_codec` to be in scope with that name.
#[proc_macro_derive(SerializeIter)]
pub fn serialize_iter_twi(item: TokenStream) -> TokenStream {
    twi_codec::twi::serialize_iter(item)
}

/// Generates the implementation block for conforming to `SerializeBuf` of the TWI flavor.
///
/// Generic types *cannot* implement `SerializeBuf`.
///
/// # Note
///
/// Requires `twi_codec` to be in scope with that name.
#[proc_macro_derive(SerializeBuf)]
pub fn serialize_buf_twi(item: TokenStream) -> TokenStream {
    twi_codec::twi::serialize_buf(item)
}
