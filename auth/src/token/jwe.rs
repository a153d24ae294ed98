//! Compact JWE encryption for a single static P-256 recipient.
//!
//! Tokens use `alg: ECDH-ES` (ephemeral-static key agreement, direct use of
//! the derived key) and `enc: A256GCM`. The content key is derived with the
//! Concat KDF from RFC 7518 section 4.6.2 and the base64url protected header
//! is bound as additional authenticated data, so any change to the header,
//! IV, ciphertext, or tag fails decryption.
//!
//! Layout: `header..iv.ciphertext.tag` (the encrypted key segment is empty in
//! direct key agreement mode).

use std::io::Read;
use std::io::Write;

use aes_gcm::aead::Aead;
use aes_gcm::aead::AeadCore;
use aes_gcm::aead::KeyInit;
use aes_gcm::aead::OsRng;
use aes_gcm::aead::Payload;
use aes_gcm::Aes256Gcm;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use p256::ecdh::EphemeralSecret;
use p256::elliptic_curve::sec1::FromEncodedPoint;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::EncodedPoint;
use p256::PublicKey;
use p256::SecretKey;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use super::errors::TokenError;

const ALGORITHM: &str = "ECDH-ES";
const ENCRYPTION: &str = "A256GCM";
const CONTENT_TYPE: &str = "JWT";
const DEFLATE: &str = "DEF";
const KEY_TYPE: &str = "EC";
const CURVE: &str = "P-256";

const KEY_BITS: u32 = 256;
const COORDINATE_SIZE: usize = 32;
const IV_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// Upper bound on the size of a decompressed payload.
pub const MAX_INFLATED_SIZE: u64 = 64 * 1024;

#[derive(Debug, Serialize, Deserialize)]
struct ProtectedHeader {
    alg: String,
    enc: String,
    epk: EphemeralPublicKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EphemeralPublicKey {
    kty: String,
    crv: String,
    x: String,
    y: String,
}

/// Encrypt `plaintext` so that only the holder of the recipient's private key can read it.
///
/// # Arguments
/// * `recipient` - Static public key of the recipient
/// * `plaintext` - Bytes to protect (a compact JWS in practice)
/// * `compress` - Raw DEFLATE the plaintext before encryption (`zip: DEF`)
///
/// # Errors
/// * `Encryption` - Key agreement, compression, or sealing failed
pub fn encrypt(
    recipient: &PublicKey,
    plaintext: &[u8],
    compress: bool,
) -> Result<String, TokenError> {
    let ephemeral = EphemeralSecret::random(&mut OsRng);
    let ephemeral_point = ephemeral.public_key().to_encoded_point(false);
    let (x, y) = match (ephemeral_point.x(), ephemeral_point.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            return Err(TokenError::Encryption(
                "ephemeral key has no affine coordinates".to_string(),
            ))
        }
    };

    let header = ProtectedHeader {
        alg: ALGORITHM.to_string(),
        enc: ENCRYPTION.to_string(),
        epk: EphemeralPublicKey {
            kty: KEY_TYPE.to_string(),
            crv: CURVE.to_string(),
            x: URL_SAFE_NO_PAD.encode(x),
            y: URL_SAFE_NO_PAD.encode(y),
        },
        zip: compress.then(|| DEFLATE.to_string()),
        cty: Some(CONTENT_TYPE.to_string()),
        typ: Some(CONTENT_TYPE.to_string()),
    };
    let header_json =
        serde_json::to_vec(&header).map_err(|e| TokenError::Encryption(e.to_string()))?;
    let protected = URL_SAFE_NO_PAD.encode(header_json);

    let shared = ephemeral.diffie_hellman(recipient);
    let cipher = content_cipher(&shared.raw_secret_bytes()[..]);

    let payload = if compress {
        deflate(plaintext)?
    } else {
        plaintext.to_vec()
    };

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut sealed = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: &payload,
                aad: protected.as_bytes(),
            },
        )
        .map_err(|_| TokenError::Encryption("sealing payload failed".to_string()))?;
    let tag = sealed.split_off(sealed.len() - TAG_SIZE);

    Ok(format!(
        "{}..{}.{}.{}",
        protected,
        URL_SAFE_NO_PAD.encode(nonce),
        URL_SAFE_NO_PAD.encode(&sealed),
        URL_SAFE_NO_PAD.encode(&tag),
    ))
}

/// Decrypt a token produced by [`encrypt`] with the recipient's private key.
///
/// # Errors
/// * `Malformed` - Structure, header, or encoding is invalid
/// * `Decryption` - Authentication of the ciphertext failed (wrong key or tampering)
pub fn decrypt(recipient: &SecretKey, token: &str) -> Result<Vec<u8>, TokenError> {
    let mut segments = token.split('.');
    let (Some(protected), Some(encrypted_key), Some(iv), Some(ciphertext), Some(tag), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed(
            "expected five compact segments".to_string(),
        ));
    };

    if !encrypted_key.is_empty() {
        return Err(TokenError::Malformed(
            "direct key agreement carries no encrypted key".to_string(),
        ));
    }

    let header: ProtectedHeader = serde_json::from_slice(&decode_segment(protected)?)
        .map_err(|e| TokenError::Malformed(format!("protected header: {}", e)))?;

    if header.alg != ALGORITHM || header.enc != ENCRYPTION {
        return Err(TokenError::Malformed(format!(
            "unsupported algorithm {}/{}",
            header.alg, header.enc
        )));
    }

    let ephemeral = ephemeral_public_key(&header.epk)?;
    let shared = p256::ecdh::diffie_hellman(recipient.to_nonzero_scalar(), ephemeral.as_affine());
    let cipher = content_cipher(&shared.raw_secret_bytes()[..]);

    let iv = decode_segment(iv)?;
    if iv.len() != IV_SIZE {
        return Err(TokenError::Malformed("invalid IV length".to_string()));
    }

    let tag = decode_segment(tag)?;
    if tag.len() != TAG_SIZE {
        return Err(TokenError::Malformed("invalid tag length".to_string()));
    }

    let mut sealed = decode_segment(ciphertext)?;
    sealed.extend_from_slice(&tag);

    let payload = cipher
        .decrypt(
            iv.as_slice().into(),
            Payload {
                msg: &sealed,
                aad: protected.as_bytes(),
            },
        )
        .map_err(|_| TokenError::Decryption)?;

    match header.zip.as_deref() {
        None => Ok(payload),
        Some(DEFLATE) => inflate(&payload),
        Some(other) => Err(TokenError::Malformed(format!(
            "unsupported compression {}",
            other
        ))),
    }
}

fn ephemeral_public_key(epk: &EphemeralPublicKey) -> Result<PublicKey, TokenError> {
    if epk.kty != KEY_TYPE || epk.crv != CURVE {
        return Err(TokenError::Malformed(format!(
            "unsupported ephemeral key {}/{}",
            epk.kty, epk.crv
        )));
    }

    let x = decode_segment(&epk.x)?;
    let y = decode_segment(&epk.y)?;
    if x.len() != COORDINATE_SIZE || y.len() != COORDINATE_SIZE {
        return Err(TokenError::Malformed(
            "invalid ephemeral key coordinates".to_string(),
        ));
    }

    let point = EncodedPoint::from_affine_coordinates(
        x.as_slice().into(),
        y.as_slice().into(),
        false,
    );

    Option::<PublicKey>::from(PublicKey::from_encoded_point(&point))
        .ok_or_else(|| TokenError::Malformed("ephemeral key is not on the curve".to_string()))
}

/// Concat KDF (single round, SHA-256) keyed for `A256GCM` with empty party info.
fn content_cipher(shared_secret: &[u8]) -> Aes256Gcm {
    let mut hasher = Sha256::new();
    hasher.update(1u32.to_be_bytes());
    hasher.update(shared_secret);
    hasher.update((ENCRYPTION.len() as u32).to_be_bytes());
    hasher.update(ENCRYPTION.as_bytes());
    hasher.update(0u32.to_be_bytes());
    hasher.update(0u32.to_be_bytes());
    hasher.update(KEY_BITS.to_be_bytes());
    let key = hasher.finalize();

    Aes256Gcm::new(&key)
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("base64url segment: {}", e)))
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| TokenError::Encryption(format!("compressing payload: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| TokenError::Encryption(format!("compressing payload: {}", e)))
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut inflated = Vec::new();
    DeflateDecoder::new(data)
        .take(MAX_INFLATED_SIZE + 1)
        .read_to_end(&mut inflated)
        .map_err(|e| TokenError::Malformed(format!("decompressing payload: {}", e)))?;

    if inflated.len() as u64 > MAX_INFLATED_SIZE {
        return Err(TokenError::Malformed(
            "decompressed payload too large".to_string(),
        ));
    }

    Ok(inflated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> SecretKey {
        SecretKey::random(&mut OsRng)
    }

    fn header_of(token: &str) -> serde_json::Value {
        let protected = token.split('.').next().unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(protected).unwrap()).unwrap()
    }

    #[test]
    fn test_encrypt_and_decrypt() {
        let key = recipient();
        let token = encrypt(&key.public_key(), b"signed.jws.payload", false).unwrap();

        assert_eq!(token.split('.').count(), 5);
        assert_eq!(token.split('.').nth(1), Some(""));

        let plaintext = decrypt(&key, &token).expect("Failed to decrypt");
        assert_eq!(plaintext, b"signed.jws.payload");
    }

    #[test]
    fn test_header_fields() {
        let key = recipient();
        let token = encrypt(&key.public_key(), b"payload", false).unwrap();
        let header = header_of(&token);

        assert_eq!(header["alg"], "ECDH-ES");
        assert_eq!(header["enc"], "A256GCM");
        assert_eq!(header["cty"], "JWT");
        assert_eq!(header["epk"]["crv"], "P-256");
        assert!(header.get("zip").is_none());
    }

    #[test]
    fn test_compressed_round_trip() {
        let key = recipient();
        let plaintext = "a".repeat(2048);
        let token = encrypt(&key.public_key(), plaintext.as_bytes(), true).unwrap();

        assert_eq!(header_of(&token)["zip"], "DEF");
        assert_eq!(decrypt(&key, &token).unwrap(), plaintext.as_bytes());
    }

    #[test]
    fn test_each_token_uses_fresh_ephemeral_key() {
        let key = recipient();
        let first = encrypt(&key.public_key(), b"payload", false).unwrap();
        let second = encrypt(&key.public_key(), b"payload", false).unwrap();

        assert_ne!(first, second);
        assert_ne!(header_of(&first)["epk"], header_of(&second)["epk"]);
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let key = recipient();
        let other = recipient();
        let token = encrypt(&key.public_key(), b"payload", false).unwrap();

        assert_eq!(decrypt(&other, &token), Err(TokenError::Decryption));
    }

    #[test]
    fn test_swapped_header_rejected() {
        let key = recipient();
        let first = encrypt(&key.public_key(), b"payload", false).unwrap();
        let second = encrypt(&key.public_key(), b"payload", false).unwrap();

        // Header of one token grafted onto the body of another
        let first_header = first.split('.').next().unwrap();
        let second_body = second.splitn(2, '.').nth(1).unwrap();
        let grafted = format!("{}.{}", first_header, second_body);

        assert!(decrypt(&key, &grafted).is_err());
    }

    #[test]
    fn test_structural_garbage_rejected() {
        let key = recipient();

        for token in ["", "a.b.c", "a..b.c.d.e", "....", "not a token"] {
            assert!(
                matches!(decrypt(&key, token), Err(TokenError::Malformed(_))),
                "accepted {:?}",
                token
            );
        }
    }

    #[test]
    fn test_encrypted_key_segment_must_be_empty() {
        let key = recipient();
        let token = encrypt(&key.public_key(), b"payload", false).unwrap();
        let with_key = token.replacen("..", ".AAAA.", 1);

        assert!(matches!(
            decrypt(&key, &with_key),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_oversized_inflation_rejected() {
        let bomb = deflate(&vec![0u8; MAX_INFLATED_SIZE as usize + 1]).unwrap();
        assert!(matches!(inflate(&bomb), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_short_iv_rejected() {
        let key = recipient();
        let token = encrypt(&key.public_key(), b"payload", false).unwrap();
        let mut segments: Vec<String> = token.split('.').map(String::from).collect();
        segments[2] = URL_SAFE_NO_PAD.encode([0u8; 8]);

        assert!(matches!(
            decrypt(&key, &segments.join(".")),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_off_curve_ephemeral_key_rejected() {
        let key = recipient();
        let token = encrypt(&key.public_key(), b"payload", false).unwrap();
        let mut segments: Vec<String> = token.split('.').map(String::from).collect();

        let mut header = header_of(&token);
        header["epk"]["y"] = header["epk"]["x"].clone();
        segments[0] = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap());

        assert!(matches!(
            decrypt(&key, &segments.join(".")),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_content_key_depends_on_shared_secret() {
        let first = content_cipher(&[1u8; 32]);
        let second = content_cipher(&[2u8; 32]);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let sealed = first.encrypt(&nonce, b"payload".as_ref()).unwrap();
        assert!(second.decrypt(&nonce, sealed.as_ref()).is_err());
        assert_eq!(first.decrypt(&nonce, sealed.as_ref()).unwrap(), b"payload");
    }
}
