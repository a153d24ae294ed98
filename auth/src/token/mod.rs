pub mod codec;
pub mod errors;
pub mod jwe;
pub mod keys;

pub use codec::TokenCodec;
pub use errors::TokenError;
pub use keys::KeyPair;
