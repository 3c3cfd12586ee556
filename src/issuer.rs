use der::Encode;
use log::debug;
use x509_cert::certificate::CertificateInner;

use crate::cert::Certificate;
use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::AuthorityKeyIdentifier;
use crate::cert::extensions::BasicConstraints;
use crate::cert::extensions::ExtendedKeyUsage;
use crate::cert::extensions::KeyUsage;
use crate::cert::extensions::SubjectAltName;
use crate::cert::extensions::SubjectKeyIdentifier;
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, ExtensionParam};
use crate::error::{FixtureError, Result};
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> Result<DistinguishedName>;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Whether the issuer is the subject itself (self-signed issuance).
    fn is_self_issued(&self) -> bool {
        false
    }

    /// Issues a certificate based on the provided certificate template.
    ///
    /// Extensions are derived from the template in this order: key usage
    /// (critical), extended key usage, basic constraints (critical, CA only),
    /// subject key identifier (CA only), authority key identifier (when not
    /// self-issued), subject alternative name.
    ///
    /// # Arguments
    /// * `cert_request` - The template describing the certificate to be issued.
    ///
    /// # Returns
    /// The signed `Certificate`.
    fn issue(&self, cert_request: &CertificationRequestInfo) -> Result<Certificate> {
        let signature_algo = SignatureAlgorithm::Sha256WithRSA;
        let issuer_dn = self.issuer_name()?;

        let mut extensions: Vec<ExtensionParam> = Vec::new();

        if !cert_request.key_usage.is_empty() {
            let key_usage = KeyUsage(cert_request.key_usage);
            extensions.push(ExtensionParam::from_extension(key_usage, true)?);
        }

        if !cert_request.usages.is_empty() {
            let extended_key_usage = ExtendedKeyUsage {
                usage: cert_request.usages.clone(),
            };
            extensions.push(ExtensionParam::from_extension(extended_key_usage, false)?);
        }

        if cert_request.is_ca {
            let basic_constraints = BasicConstraints {
                is_ca: true,
                max_path_length: None,
            };
            extensions.push(ExtensionParam::from_extension(basic_constraints, true)?);

            let subject_key_id =
                SubjectKeyIdentifier(cert_request.subject_public_key.key_identifier()?);
            extensions.push(ExtensionParam::from_extension(subject_key_id, false)?);
        }

        if !self.is_self_issued() {
            let authority_key_id = AuthorityKeyIdentifier {
                key_identifier: self.signing_key().key_identifier()?,
            };
            extensions.push(ExtensionParam::from_extension(authority_key_id, false)?);
        }

        if !cert_request.dns_names.is_empty() {
            let san = SubjectAltName {
                names: cert_request.dns_names.clone(),
            };
            extensions.push(ExtensionParam::from_extension(san, false)?);
        }

        let tbs_cert = TbsCertificate {
            serial_number: cert_request.serial_number,
            signature_algorithm: signature_algo,
            issuer: issuer_dn,
            validity: cert_request.validity.clone(),
            subject: cert_request.subject.clone(),
            subject_public_key: cert_request.subject_public_key.clone(),
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| FixtureError::CertificateError(e.to_string()))?;

        let signature = self.signing_key().sign_data(&tbs_der)?;
        debug!(
            "signed serial {} for {:?} ({} byte TBS)",
            cert_request.serial_number,
            cert_request.subject.common_name,
            tbs_der.len()
        );

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: signature_algo.into(),
            signature: der::asn1::BitString::from_bytes(&signature)
                .map_err(|e| FixtureError::CertificateError(e.to_string()))?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}
