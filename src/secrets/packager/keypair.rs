//! Private key sanity checks.
//!
//! A key is accepted only if `ring` can load it and its public half is the
//! one carried by the leaf certificate. Supported keys are RSA (2048 bits and
//! up), ECDSA P-256/P-384 and Ed25519.

use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, Ed25519KeyPair, KeyPair, RsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
    ECDSA_P384_SHA384_ASN1_SIGNING,
};
use x509_parser::prelude::*;

use crate::secrets::error::{ConversionError, Result};

/// Check that `pkcs8` is a usable private key for the certificate `leaf_der`.
pub(crate) fn ensure_key_matches(pkcs8: &[u8], leaf_der: &[u8]) -> Result<()> {
    let public_key = public_key_of(pkcs8)
        .ok_or_else(|| ConversionError::packaging("private key is invalid or unsupported"))?;

    let (_, leaf) = X509Certificate::from_der(leaf_der).map_err(|err| {
        ConversionError::packaging(format!("unable to decode leaf certificate: {err}"))
    })?;

    if leaf.public_key().subject_public_key.data.as_ref() != public_key.as_slice() {
        return Err(ConversionError::packaging("private key does not match the leaf certificate"));
    }
    Ok(())
}

/// Public key bytes as they appear in a certificate's `subjectPublicKey`.
fn public_key_of(pkcs8: &[u8]) -> Option<Vec<u8>> {
    if let Ok(pair) = RsaKeyPair::from_pkcs8(pkcs8) {
        return Some(pair.public_key().as_ref().to_vec());
    }

    let rng = SystemRandom::new();
    for alg in [&ECDSA_P256_SHA256_ASN1_SIGNING, &ECDSA_P384_SHA384_ASN1_SIGNING] {
        if let Ok(pair) = EcdsaKeyPair::from_pkcs8(alg, pkcs8, &rng) {
            return Some(pair.public_key().as_ref().to_vec());
        }
    }

    Ed25519KeyPair::from_pkcs8_maybe_unchecked(pkcs8)
        .ok()
        .map(|pair| pair.public_key().as_ref().to_vec())
}
