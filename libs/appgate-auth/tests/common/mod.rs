//! Shared helpers: a real ES256 key pair, its JWKS rendering and token
//! signing, so the pipeline is exercised against genuine signatures.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

pub struct TestKey {
    pub kid: String,
    pub encoding_key: EncodingKey,
    pub jwk: serde_json::Value,
}

pub fn es256_key(kid: &str) -> TestKey {
    let key_pair = rcgen::KeyPair::generate_for(&rcgen::PKCS_ECDSA_P256_SHA256).unwrap();
    let encoding_key = EncodingKey::from_ec_pem(key_pair.serialize_pem().as_bytes()).unwrap();

    // The raw public key ends with the uncompressed SEC1 point
    // (0x04 || X || Y) from which the JWK coordinates come.
    let raw = key_pair.public_key_raw();
    let point = &raw[raw.len() - 65..];
    assert_eq!(point[0], 0x04, "expected an uncompressed EC point");

    TestKey {
        kid: kid.to_owned(),
        encoding_key,
        jwk: serde_json::json!({
            "kty": "EC",
            "crv": "P-256",
            "kid": kid,
            "x": URL_SAFE_NO_PAD.encode(&point[1..33]),
            "y": URL_SAFE_NO_PAD.encode(&point[33..65]),
        }),
    }
}

pub fn jwks_document(keys: &[&TestKey]) -> serde_json::Value {
    serde_json::json!({ "keys": keys.iter().map(|k| k.jwk.clone()).collect::<Vec<_>>() })
}

pub fn sign(key: &TestKey, claims: &serde_json::Value) -> String {
    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(key.kid.clone());
    encode(&header, claims, &key.encoding_key).unwrap()
}

pub fn future_exp() -> i64 {
    unix_now() + 3600
}

pub fn past_exp() -> i64 {
    unix_now() - 3600
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
