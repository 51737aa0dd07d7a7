//! Normalization of TLS private keys to PKCS#8.
//!
//! Secrets carry keys as PKCS#8 (`PRIVATE KEY`), PKCS#1 (`RSA PRIVATE KEY`)
//! or SEC1 (`EC PRIVATE KEY`). PKCS#12 key bags hold PKCS#8, so the other
//! two forms are wrapped in a `PrivateKeyInfo` structure.

use rustls::pki_types::PrivateKeyDer;
use simple_asn1::{from_der, to_der, ASN1Block, ASN1Class, BigInt, BigUint, OID};
use zeroize::Zeroizing;

use crate::secrets::error::{ConversionError, Result};

const RSA_ENCRYPTION: &[u64] = &[1, 2, 840, 113549, 1, 1, 1];
const EC_PUBLIC_KEY: &[u64] = &[1, 2, 840, 10045, 2, 1];

/// Convert any supported private key encoding into PKCS#8 DER.
pub(crate) fn to_pkcs8(key: &PrivateKeyDer<'_>) -> Result<Zeroizing<Vec<u8>>> {
    match key {
        PrivateKeyDer::Pkcs8(key) => Ok(Zeroizing::new(key.secret_pkcs8_der().to_vec())),
        PrivateKeyDer::Pkcs1(key) => wrap_pkcs1(key.secret_pkcs1_der()),
        PrivateKeyDer::Sec1(key) => wrap_sec1(key.secret_sec1_der()),
        _ => Err(ConversionError::packaging("unsupported private key encoding")),
    }
}

fn wrap_pkcs1(der: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let algorithm = ASN1Block::Sequence(
        0,
        vec![ASN1Block::ObjectIdentifier(0, oid(RSA_ENCRYPTION)), ASN1Block::Null(0)],
    );
    private_key_info(algorithm, der)
}

fn wrap_sec1(der: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let curve = sec1_curve(der)?;
    let algorithm = ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::ObjectIdentifier(0, oid(EC_PUBLIC_KEY)),
            ASN1Block::ObjectIdentifier(0, curve),
        ],
    );
    private_key_info(algorithm, der)
}

fn private_key_info(algorithm: ASN1Block, key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let info = ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::Integer(0, BigInt::from(0)),
            algorithm,
            ASN1Block::OctetString(0, key.to_vec()),
        ],
    );

    to_der(&info).map(Zeroizing::new).map_err(|err| {
        ConversionError::packaging(format!("unable to encode PKCS#8 private key: {err}"))
    })
}

/// Extract the named curve from the `[0] parameters` field of an ECPrivateKey.
fn sec1_curve(der: &[u8]) -> Result<OID> {
    let blocks = from_der(der).map_err(|err| {
        ConversionError::packaging(format!("unable to parse EC private key: {err}"))
    })?;

    let fields = match blocks.first() {
        Some(ASN1Block::Sequence(_, items)) => items,
        _ => return Err(ConversionError::packaging("EC private key is not a sequence")),
    };

    let zero = BigUint::from(0u8);
    fields
        .iter()
        .find_map(|field| match field {
            ASN1Block::Explicit(ASN1Class::ContextSpecific, _, tag, inner) if *tag == zero => {
                match inner.as_ref() {
                    ASN1Block::ObjectIdentifier(_, curve) => Some(curve.clone()),
                    _ => None,
                }
            }
            _ => None,
        })
        .ok_or_else(|| ConversionError::packaging("EC private key does not name its curve"))
}

fn oid(arcs: &[u64]) -> OID {
    OID::new(arcs.iter().map(|arc| BigUint::from(*arc)).collect())
}
