use crate::error::FixtureError;
use der::asn1::{OctetString, UtcTime};
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::serial_number::SerialNumber;
use x509_cert::time::Time;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{DistinguishedName, ExtensionParam, Validity};
use crate::key::PublicKey;

/// Represents the "To Be Signed" (TBS) portion of an X.509 certificate.
///
/// # Fields
/// * `serial_number` - The certificate serial number.
/// * `signature_algorithm` - The algorithm used to sign the certificate.
/// * `issuer` - The distinguished name of the certificate issuer.
/// * `validity` - The certificate's validity period.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `extensions` - Additional X.509 extensions for the certificate.
pub struct TbsCertificate {
    pub serial_number: u64,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: DistinguishedName,
    pub validity: Validity,
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Converts the `TbsCertificate` into a `TbsCertificateInner` for DER encoding.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner, FixtureError> {
        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        // UTCTime covers 1950..2049, which is all a fixture set ever needs.
        let validity = x509_cert::time::Validity {
            not_before: utc_time(self.validity.not_before)?,
            not_after: utc_time(self.validity.not_after)?,
        };

        let serial_number = SerialNumber::new(&serial_to_bytes(self.serial_number))?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: self.signature_algorithm.into(),
            issuer: self.issuer.as_x509_name()?,
            validity,
            subject: self.subject.as_x509_name()?,
            subject_public_key_info: self.subject_public_key.as_spki()?,
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: if extensions.is_empty() {
                None
            } else {
                Some(extensions)
            },
        })
    }

    /// Creates a `TbsCertificate` from a `TbsCertificateInner`.
    pub fn from_tbs_certificate_inner(inner: &TbsCertificateInner) -> Result<Self, FixtureError> {
        let issuer = DistinguishedName::from_x509_name(&inner.issuer)?;
        let subject = DistinguishedName::from_x509_name(&inner.subject)?;
        let subject_public_key = PublicKey::from_x509spki(&inner.subject_public_key_info)?;

        let extensions = inner
            .extensions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|ext| ExtensionParam {
                oid: ext.extn_id,
                critical: ext.critical,
                value: ext.extn_value.as_bytes().to_vec(),
            })
            .collect::<Vec<_>>();

        let validity = Validity {
            not_before: offset_date_time(&inner.validity.not_before),
            not_after: offset_date_time(&inner.validity.not_after),
        };

        let signature_algorithm = SignatureAlgorithm::try_from(&inner.signature)?;

        Ok(Self {
            serial_number: serial_from_bytes(inner.serial_number.as_bytes())?,
            signature_algorithm,
            issuer,
            validity,
            subject,
            subject_public_key,
            extensions,
        })
    }
}

fn utc_time(instant: time::OffsetDateTime) -> Result<Time, FixtureError> {
    let utc = UtcTime::from_system_time(instant.into())
        .map_err(|e| FixtureError::InvalidInput(format!("{instant}: {e}")))?;
    Ok(Time::UtcTime(utc))
}

fn offset_date_time(t: &Time) -> time::OffsetDateTime {
    match t {
        Time::UtcTime(ut) => time::OffsetDateTime::from(ut.to_system_time()),
        Time::GeneralTime(gt) => time::OffsetDateTime::from(gt.to_system_time()),
    }
}

/// Minimal big-endian two's complement encoding of a positive serial.
fn serial_to_bytes(serial: u64) -> Vec<u8> {
    let bytes = serial.to_be_bytes();
    let first = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len() - 1);
    let mut encoded = Vec::with_capacity(bytes.len() - first + 1);
    if bytes[first] & 0x80 != 0 {
        encoded.push(0);
    }
    encoded.extend_from_slice(&bytes[first..]);
    encoded
}

fn serial_from_bytes(bytes: &[u8]) -> Result<u64, FixtureError> {
    let trimmed = match bytes.iter().position(|b| *b != 0) {
        Some(first) => &bytes[first..],
        None => return Ok(0),
    };
    if trimmed.len() > 8 {
        return Err(FixtureError::DecodingError(format!(
            "serial number of {} bytes does not fit in u64",
            trimmed.len()
        )));
    }
    Ok(trimmed.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}
