pub mod cipher;
pub mod digest;

pub use cipher::{decrypt, encrypt, CryptoError, DecryptionError};
pub use digest::{hash_input, sha256_hex};
