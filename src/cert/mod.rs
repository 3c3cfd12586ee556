pub mod extensions;
pub mod params;

use crate::error::{FixtureError, Result};
use der::asn1::{AnyRef, Null};
use der::{Decode, Encode, EncodePem};
use extensions::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAltName, ToAndFromX509Extension,
};
use params::{CertificationRequestInfo, DistinguishedName, Validity};
use x509_cert::certificate::CertificateInner;
use x509_cert::spki::AlgorithmIdentifierOwned;

use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};
use crate::pem_utils;
use crate::tbs_certificate::TbsCertificate;

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

impl From<SignatureAlgorithm> for AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA signature identifiers carry an explicit NULL parameter.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(AnyRef::from(Null).into()),
            },
        }
    }
}

impl TryFrom<&AlgorithmIdentifierOwned> for SignatureAlgorithm {
    type Error = FixtureError;

    fn try_from(value: &AlgorithmIdentifierOwned) -> Result<Self> {
        match value.oid {
            const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION => {
                Ok(SignatureAlgorithm::Sha256WithRSA)
            }
            oid => Err(FixtureError::DecodingError(format!(
                "Unsupported signature algorithm {oid}"
            ))),
        }
    }
}

/// Represents an X.509 certificate.
///
/// This struct provides methods to encode the certificate into DER or PEM
/// formats and to read back the fields the fixture set cares about.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| FixtureError::EncodingError(e.to_string()))
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| FixtureError::EncodingError(e.to_string()))
    }

    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = x509_cert::Certificate::from_der(der)?;
        Ok(Certificate { inner })
    }

    /// Parses a single `CERTIFICATE` PEM block.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let der = pem_utils::pem_to_der(pem, pem_utils::CERTIFICATE_LABEL)?;
        Self::from_der(&der)
    }

    /// Decodes the to-be-signed portion into the crate's own model.
    pub fn to_tbs(&self) -> Result<TbsCertificate> {
        TbsCertificate::from_tbs_certificate_inner(&self.inner.tbs_certificate)
    }

    pub fn serial_number(&self) -> Result<u64> {
        Ok(self.to_tbs()?.serial_number)
    }

    pub fn subject(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> Result<DistinguishedName> {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    pub fn validity(&self) -> Result<Validity> {
        Ok(self.to_tbs()?.validity)
    }

    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Returns the first extension of type `E`, if present.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        self.inner
            .tbs_certificate
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Whether the basic constraints extension marks this certificate as a CA.
    pub fn is_ca(&self) -> Result<bool> {
        Ok(self
            .extension::<BasicConstraints>()?
            .map(|bc| bc.is_ca)
            .unwrap_or(false))
    }

    /// Issuer equals subject and the signature verifies under the certificate's own key.
    pub fn is_self_signed(&self) -> Result<bool> {
        if self.inner.tbs_certificate.issuer != self.inner.tbs_certificate.subject {
            return Ok(false);
        }
        Ok(self.verify_signature(&self.public_key()?).is_ok())
    }

    /// Verifies the certificate signature with the given issuer public key.
    pub fn verify_signature(&self, issuer_key: &PublicKey) -> Result<()> {
        SignatureAlgorithm::try_from(&self.inner.signature_algorithm)?;
        let tbs_der = self.inner.tbs_certificate.to_der()?;
        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            FixtureError::SignatureError("signature has unused bits".to_string())
        })?;
        issuer_key.verify(&tbs_der, signature)
    }

    /// Checks that `issuer` names this certificate's issuer and holds the key that signed it.
    pub fn verify_issued_by(&self, issuer: &Certificate) -> Result<()> {
        if self.inner.tbs_certificate.issuer != issuer.inner.tbs_certificate.subject {
            return Err(FixtureError::SignatureError(format!(
                "issuer {:?} does not match {:?}",
                self.issuer()?.common_name,
                issuer.subject()?.common_name
            )));
        }
        self.verify_signature(&issuer.public_key()?)
    }

    /// Extracts certificate information into a `CertificationRequestInfo` object.
    pub fn to_cert_info(&self) -> Result<CertificationRequestInfo> {
        let tbs = self.to_tbs()?;

        let usages = self
            .extension::<ExtendedKeyUsage>()?
            .map(|eku| eku.usage)
            .unwrap_or_default();
        let key_usage = self
            .extension::<KeyUsage>()?
            .map(|ku| ku.0)
            .unwrap_or_default();
        let dns_names = self
            .extension::<SubjectAltName>()?
            .map(|san| san.names)
            .unwrap_or_default();
        let is_ca = self.is_ca()?;

        Ok(CertificationRequestInfo {
            serial_number: tbs.serial_number,
            subject: tbs.subject,
            subject_public_key: tbs.subject_public_key,
            validity: tbs.validity,
            key_usage,
            usages,
            dns_names,
            is_ca,
        })
    }

    /// Creates a new self-signed certificate.
    ///
    /// # Arguments
    /// * `cert_info` - The certificate template.
    /// * `key` - The key pair used to sign the certificate.
    pub fn new_self_signed(cert_info: &CertificationRequestInfo, key: &KeyPair) -> Result<Self> {
        // For self-signed certificates, the issuer is the same as the subject
        let self_issuer = SelfIssuer {
            name: cert_info.subject.clone(),
            key,
        };
        self_issuer.issue(cert_info)
    }
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: DistinguishedName,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Result<DistinguishedName> {
        Ok(self.name.clone())
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn is_self_issued(&self) -> bool {
        true
    }
}

/// A certificate together with its private key: one identity of the fixture set.
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> Result<DistinguishedName> {
        // The name of the issuer is the subject of the certificate
        self.cert.subject()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsa_signature_algorithm_has_null_parameters() {
        let alg: AlgorithmIdentifierOwned = SignatureAlgorithm::Sha256WithRSA.into();
        let der = alg.to_der().unwrap();
        // SEQUENCE { OID 1.2.840.113549.1.1.11, NULL }
        assert_eq!(&der[der.len() - 2..], &[0x05, 0x00]);
        assert_eq!(
            SignatureAlgorithm::try_from(&alg).unwrap(),
            SignatureAlgorithm::Sha256WithRSA
        );
    }

    #[test]
    fn test_unknown_signature_algorithm() {
        let alg = AlgorithmIdentifierOwned {
            oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
            parameters: None,
        };
        assert!(SignatureAlgorithm::try_from(&alg).is_err());
    }
}
