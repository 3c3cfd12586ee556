//! Password-protected PKCS#12 bundles holding one private key and its certificate.

use log::debug;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::X509;

use crate::cert::Certificate;
use crate::error::{FixtureError, Result};
use crate::key::KeyPair;

/// What comes out of an opened archive.
#[derive(Debug, Clone)]
pub struct ArchiveContents {
    pub key: KeyPair,
    pub cert: Certificate,
}

/// Seals `key` and `cert` into a DER-encoded PKCS#12 archive.
///
/// `friendly_name` becomes the bag's friendlyName attribute.
pub fn seal(
    friendly_name: &str,
    key: &KeyPair,
    cert: &Certificate,
    password: &str,
) -> Result<Vec<u8>> {
    let rsa = Rsa::private_key_from_der(&key.to_pkcs1_der()?)?;
    let pkey = PKey::from_rsa(rsa)?;
    let x509 = X509::from_der(&cert.to_der()?)?;

    let mut builder = Pkcs12::builder();
    builder.name(friendly_name).pkey(&pkey).cert(&x509);
    let pkcs12 = builder.build2(password)?;
    let der = pkcs12.to_der()?;

    debug!("sealed {friendly_name:?} into {} byte PKCS#12 archive", der.len());
    Ok(der)
}

/// Opens a DER-encoded PKCS#12 archive with `password`.
///
/// Fails when the password is wrong or the archive lacks a key or certificate.
pub fn open(der: &[u8], password: &str) -> Result<ArchiveContents> {
    let parsed = Pkcs12::from_der(der)?.parse2(password)?;

    let pkey = parsed
        .pkey
        .ok_or_else(|| FixtureError::ArchiveError("archive holds no private key".to_string()))?;
    let x509 = parsed
        .cert
        .ok_or_else(|| FixtureError::ArchiveError("archive holds no certificate".to_string()))?;

    let key = KeyPair::import_from_pkcs1_der(&pkey.rsa()?.private_key_to_der()?)?;
    let cert = Certificate::from_der(&x509.to_der()?)?;
    Ok(ArchiveContents { key, cert })
}
