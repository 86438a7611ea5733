//! AES-256-CBC envelope cipher used by every gateway flow.
//!
//! The gateway protocol fixes the IV to the ASCII bytes `0123456789abcdef` and expects
//! PKCS#7 padding applied by the caller, with the cipher itself running unpadded. The
//! static IV means identical plaintexts produce identical ciphertexts under the same key.
//! Any change to the IV or padding breaks compatibility with the gateway.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use openssl::error::ErrorStack;
use openssl::symm::{Cipher, Crypter, Mode};
use thiserror::Error;

pub const STATIC_IV: &[u8; 16] = b"0123456789abcdef";
pub const BLOCK_SIZE: usize = 16;
pub const KEY_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption key is not valid base64: {0}")]
    KeyEncoding(#[from] base64::DecodeError),
    #[error("Encryption key must be 32 bytes, got {0}")]
    KeyLength(usize),
    #[error("Cipher failure: {0}")]
    Cipher(#[from] ErrorStack),
}

#[derive(Error, Debug)]
pub enum DecryptionError {
    #[error("Invalid key: {0}")]
    Key(#[from] CryptoError),
    #[error("Ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("Ciphertext length {0} is not a positive multiple of 16")]
    Length(usize),
    #[error("Invalid PKCS#7 padding")]
    Padding,
    #[error("Decrypted payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Cipher failure: {0}")]
    Cipher(ErrorStack),
}

/// Decodes a base64 merchant key and checks it is an AES-256 key.
pub fn decode_key(base64_key: &str) -> Result<Vec<u8>, CryptoError> {
    let key = STANDARD.decode(base64_key.trim())?;
    if key.len() != KEY_LEN {
        return Err(CryptoError::KeyLength(key.len()));
    }
    Ok(key)
}

/// Encrypts `plaintext` and returns the base64 ciphertext.
pub fn encrypt(plaintext: &str, base64_key: &str) -> Result<String, CryptoError> {
    let key = decode_key(base64_key)?;
    let padded = pkcs7_pad(plaintext.as_bytes(), BLOCK_SIZE);
    let encrypted = run(Mode::Encrypt, &key, &padded)?;
    Ok(STANDARD.encode(encrypted))
}

/// Decrypts a base64 ciphertext produced by [`encrypt`] (or by the gateway).
pub fn decrypt(base64_ciphertext: &str, base64_key: &str) -> Result<String, DecryptionError> {
    let key = decode_key(base64_key)?;
    let encrypted = STANDARD.decode(base64_ciphertext.trim())?;
    if encrypted.is_empty() || encrypted.len() % BLOCK_SIZE != 0 {
        return Err(DecryptionError::Length(encrypted.len()));
    }

    let padded = run(Mode::Decrypt, &key, &encrypted).map_err(|e| match e {
        CryptoError::Cipher(stack) => DecryptionError::Cipher(stack),
        other => DecryptionError::Key(other),
    })?;
    let plain = pkcs7_unpad(&padded)?;
    Ok(String::from_utf8(plain.to_vec())?)
}

fn run(mode: Mode, key: &[u8], input: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Cipher::aes_256_cbc();
    let mut crypter = Crypter::new(cipher, mode, key, Some(STATIC_IV.as_slice()))?;
    crypter.pad(false);

    let mut out = vec![0u8; input.len() + cipher.block_size()];
    let mut count = crypter.update(input, &mut out)?;
    count += crypter.finalize(&mut out[count..])?;
    out.truncate(count);
    Ok(out)
}

fn pkcs7_pad(input: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - (input.len() % block_size);
    let mut out = Vec::with_capacity(input.len() + pad_len);
    out.extend_from_slice(input);
    out.resize(input.len() + pad_len, pad_len as u8);
    out
}

fn pkcs7_unpad(input: &[u8]) -> Result<&[u8], DecryptionError> {
    let pad_len = *input.last().ok_or(DecryptionError::Padding)? as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > input.len() {
        return Err(DecryptionError::Padding);
    }

    let (plain, padding) = input.split_at(input.len() - pad_len);
    if padding.iter().any(|&b| b as usize != pad_len) {
        return Err(DecryptionError::Padding);
    }
    Ok(plain)
}
