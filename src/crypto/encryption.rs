//! OpenSSL-compatible passphrase encryption
//!
//! Produces and reads the classic `openssl enc -aes-256-cbc -md md5` layout:
//!
//! ```text
//! base64( "Salted__" || salt[8] || AES-256-CBC(PKCS#7(plaintext)) )
//! ```
//!
//! The AES key and IV are stretched from the passphrase and the salt with
//! EVP_BytesToKey (MD5, one iteration). Every encryption draws a fresh random
//! salt, so encrypting the same plaintext twice never yields the same blob.

use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{HearthError, HearthResult};

use super::SecureBytes;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Magic marker at the start of every decoded blob
pub const SALTED_MAGIC: &[u8; 8] = b"Salted__";

/// Size of the random per-encryption salt in bytes
pub const SALT_SIZE: usize = 8;

/// Size of the AES-256 key in bytes
const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector in bytes
const IV_SIZE: usize = 16;

/// AES block size in bytes
const BLOCK_SIZE: usize = 16;

/// Length of the "Salted__" header plus salt
const HEADER_SIZE: usize = SALTED_MAGIC.len() + SALT_SIZE;

/// Stretch a passphrase and salt into key || IV (EVP_BytesToKey, MD5, 1 round)
fn bytes_to_key(passphrase: &[u8], salt: &[u8; SALT_SIZE]) -> SecureBytes {
    let mut material = SecureBytes::with_capacity(KEY_SIZE + IV_SIZE);
    let mut previous: Option<[u8; 16]> = None;

    while material.len() < KEY_SIZE + IV_SIZE {
        let mut hasher = Md5::new();
        if let Some(prev) = &previous {
            hasher.update(prev);
        }
        hasher.update(passphrase);
        hasher.update(salt);

        let digest: [u8; 16] = hasher.finalize().into();
        material.extend_from_slice(&digest);
        previous = Some(digest);
    }

    if let Some(mut prev) = previous {
        prev.zeroize();
    }
    material
}

/// Encrypt with an explicit salt
///
/// Only useful for reproducing known blobs; use [`encrypt_with_passphrase`]
/// for real data.
pub fn encrypt_with_salt(
    plaintext: &[u8],
    passphrase: &str,
    salt: &[u8; SALT_SIZE],
) -> HearthResult<String> {
    let material = bytes_to_key(passphrase.as_bytes(), salt);
    let cipher = Aes256CbcEnc::new_from_slices(
        &material[..KEY_SIZE],
        &material[KEY_SIZE..KEY_SIZE + IV_SIZE],
    )
    .map_err(|e| HearthError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    blob.extend_from_slice(SALTED_MAGIC);
    blob.extend_from_slice(salt);
    blob.extend_from_slice(&ciphertext);

    Ok(STANDARD.encode(blob))
}

/// Fills a salt buffer before encryption
pub type SaltSource = fn(&mut [u8; SALT_SIZE]) -> HearthResult<()>;

/// Fill a salt from the operating-system RNG
pub fn random_salt(salt: &mut [u8; SALT_SIZE]) -> HearthResult<()> {
    OsRng
        .try_fill_bytes(salt)
        .map_err(|e| HearthError::Encryption(format!("Failed to generate salt: {}", e)))
}

/// Encrypt plaintext under a passphrase with a salt drawn from `salt_source`
pub fn encrypt_with_salt_source(
    plaintext: &[u8],
    passphrase: &str,
    salt_source: SaltSource,
) -> HearthResult<String> {
    let mut salt = [0u8; SALT_SIZE];
    salt_source(&mut salt)?;
    encrypt_with_salt(plaintext, passphrase, &salt)
}

/// Encrypt plaintext under a passphrase with a fresh random salt
pub fn encrypt_with_passphrase(plaintext: &[u8], passphrase: &str) -> HearthResult<String> {
    encrypt_with_salt_source(plaintext, passphrase, random_salt)
}

/// Decrypt a base64 "Salted__" blob with a passphrase
pub fn decrypt_with_passphrase(blob: &str, passphrase: &str) -> HearthResult<Vec<u8>> {
    let raw = STANDARD
        .decode(blob)
        .map_err(|e| HearthError::Encryption(format!("Invalid base64 encoding: {}", e)))?;

    if raw.len() < HEADER_SIZE || !raw.starts_with(SALTED_MAGIC) {
        return Err(HearthError::Encryption("Missing salted header".to_string()));
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&raw[SALTED_MAGIC.len()..HEADER_SIZE]);
    let ciphertext = &raw[HEADER_SIZE..];

    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(HearthError::Encryption(format!(
            "Invalid ciphertext length: {}",
            ciphertext.len()
        )));
    }

    let material = bytes_to_key(passphrase.as_bytes(), &salt);
    let cipher = Aes256CbcDec::new_from_slices(
        &material[..KEY_SIZE],
        &material[KEY_SIZE..KEY_SIZE + IV_SIZE],
    )
    .map_err(|e| HearthError::Encryption(format!("Failed to create cipher: {}", e)))?;

    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| {
            HearthError::Encryption("Decryption failed: invalid key or corrupted data".to_string())
        })
}

/// Check whether a string decodes to something carrying the salted header
pub fn looks_salted(blob: &str) -> bool {
    STANDARD
        .decode(blob)
        .map(|raw| raw.len() > HEADER_SIZE && raw.starts_with(SALTED_MAGIC))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN_SALT: [u8; SALT_SIZE] = [1, 2, 3, 4, 5, 6, 7, 8];

    // printf 'Hello, family!' | openssl enc -aes-256-cbc -md md5 \
    //     -S 0102030405060708 -pass pass:correct-horse
    const KNOWN_BLOB: &str = "U2FsdGVkX18BAgMEBQYHCAorqn1yGCAyNPSF6aLnJ1I=";

    #[test]
    fn test_bytes_to_key_matches_openssl() {
        let material = bytes_to_key(b"correct-horse", &KNOWN_SALT);
        assert_eq!(
            hex::encode(&material[..KEY_SIZE]),
            "e6e1d613d61fc644b1ddf76ebb33f5ea71e6c67ba50bf04f44a0d415c093b5b5"
        );
        assert_eq!(
            hex::encode(&material[KEY_SIZE..KEY_SIZE + IV_SIZE]),
            "9a24a62dc6709d3596873ca55444b3df"
        );
    }

    #[test]
    fn test_encrypt_matches_openssl() {
        let blob = encrypt_with_salt(b"Hello, family!", "correct-horse", &KNOWN_SALT).unwrap();
        assert_eq!(blob, KNOWN_BLOB);
    }

    #[test]
    fn test_decrypt_openssl_blob() {
        let plaintext = decrypt_with_passphrase(KNOWN_BLOB, "correct-horse").unwrap();
        assert_eq!(plaintext, b"Hello, family!");
    }

    #[test]
    fn test_decrypt_openssl_empty_plaintext() {
        let blob = "U2FsdGVkX18RIjNEVWZ3iLuabyhq+xuMNtoZmv59cYA=";
        let plaintext = decrypt_with_passphrase(blob, "correct-horse").unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn test_encrypt_decrypt() {
        let plaintext = b"Groceries: $82.17";
        let blob = encrypt_with_passphrase(plaintext, "passphrase").unwrap();
        assert!(blob.starts_with("U2FsdGVkX1"));
        assert!(looks_salted(&blob));

        let decrypted = decrypt_with_passphrase(&blob, "passphrase").unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_salt_source_is_used() {
        fn known_salt(salt: &mut [u8; SALT_SIZE]) -> HearthResult<()> {
            salt.copy_from_slice(&KNOWN_SALT);
            Ok(())
        }

        let blob =
            encrypt_with_salt_source(b"Hello, family!", "correct-horse", known_salt).unwrap();
        assert_eq!(blob, KNOWN_BLOB);
    }

    #[test]
    fn test_failing_salt_source_propagates() {
        fn broken_rng(_salt: &mut [u8; SALT_SIZE]) -> HearthResult<()> {
            Err(HearthError::Encryption("rng unavailable".to_string()))
        }

        let err = encrypt_with_salt_source(b"hello", "passphrase", broken_rng).unwrap_err();
        assert!(err.is_encryption());
    }

    #[test]
    fn test_different_salts() {
        let blob1 = encrypt_with_passphrase(b"same", "passphrase").unwrap();
        let blob2 = encrypt_with_passphrase(b"same", "passphrase").unwrap();
        assert_ne!(blob1, blob2);
    }

    #[test]
    fn test_large_plaintext() {
        let plaintext: Vec<u8> = (0..10000).map(|i| (i % 256) as u8).collect();
        let blob = encrypt_with_passphrase(&plaintext, "passphrase").unwrap();
        let decrypted = decrypt_with_passphrase(&blob, "passphrase").unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_wrong_passphrase_never_yields_plaintext() {
        let blob = encrypt_with_passphrase(b"Hello, family!", "right").unwrap();
        let result = decrypt_with_passphrase(&blob, "wrong");
        assert_ne!(result.ok(), Some(b"Hello, family!".to_vec()));
    }

    #[test]
    fn test_invalid_base64_fails() {
        let err = decrypt_with_passphrase("hello world", "passphrase").unwrap_err();
        assert!(err.is_encryption());
        assert!(!looks_salted("hello world"));
    }

    #[test]
    fn test_missing_header_fails() {
        let blob = STANDARD.encode(b"not a salted blob at all!!");
        let err = decrypt_with_passphrase(&blob, "passphrase").unwrap_err();
        assert!(err.to_string().contains("Missing salted header"));
    }

    #[test]
    fn test_misaligned_ciphertext_fails() {
        let mut raw = Vec::new();
        raw.extend_from_slice(SALTED_MAGIC);
        raw.extend_from_slice(&KNOWN_SALT);
        raw.extend_from_slice(&[0u8; 15]);
        let err = decrypt_with_passphrase(&STANDARD.encode(raw), "passphrase").unwrap_err();
        assert!(err.to_string().contains("Invalid ciphertext length"));
    }

    #[test]
    fn test_header_only_fails() {
        let mut raw = Vec::new();
        raw.extend_from_slice(SALTED_MAGIC);
        raw.extend_from_slice(&KNOWN_SALT);
        let blob = STANDARD.encode(raw);
        assert!(decrypt_with_passphrase(&blob, "passphrase").is_err());
        assert!(!looks_salted(&blob));
    }
}
