pub(crate) mod decode;
pub(crate) mod decoder;
pub(crate) mod decoded;
pub(crate) mod source;
