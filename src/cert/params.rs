use bon::Builder;
use const_oid::ObjectIdentifier;
use time::OffsetDateTime;
use x509_cert::name::RdnSequence;

use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::ExtendedKeyUsageOption;
pub use crate::cert::extensions::{FlagSet, KeyUsages};
use crate::error::FixtureError;
use crate::key::PublicKey;

const CN: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
const C: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
const O: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
const OU: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Template for an X.509 certificate.
///
/// # Fields
/// * `serial_number` - The serial number assigned to the certificate.
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `key_usage` - Key usage bits; no extension is emitted when empty.
/// * `usages` - A list of extended key usage options.
/// * `dns_names` - DNS names placed in the subject alternative name extension.
/// * `is_ca` - Indicates if the certificate is a CA.
#[derive(Clone, Debug, Builder)]
pub struct CertificationRequestInfo {
    pub serial_number: u64,
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    pub validity: Validity,
    #[builder(default)]
    pub key_usage: FlagSet<KeyUsages>,
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub is_ca: bool,
}

/// Distinguished name parameters for building an X.509 certificate.
///
/// Attributes left as `None` are not encoded.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub country: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509-compatible format.
    ///
    /// The encoded RDN sequence runs from the country down to the common name.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName, FixtureError> {
        use core::str::FromStr;

        let attributes = [
            ("CN", Some(&self.common_name)),
            ("OU", self.organization_unit.as_ref()),
            ("O", self.organization.as_ref()),
            ("C", self.country.as_ref()),
        ];
        // RFC 4514 strings list the most specific RDN first.
        let rfc4514_name = attributes
            .iter()
            .filter_map(|(key, value)| value.map(|v| format!("{key}={}", escape_rfc4514(v))))
            .collect::<Vec<_>>()
            .join(",");

        RdnSequence::from_str(&rfc4514_name)
            .map_err(|e| FixtureError::InvalidInput(format!("{rfc4514_name}: {e}")))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    pub fn from_x509_name(
        x509dn: &x509_cert::name::DistinguishedName,
    ) -> Result<Self, FixtureError> {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let value = std::str::from_utf8(attr.value.value())
                    .map_err(|e| FixtureError::DecodingError(e.to_string()))?
                    .to_string();
                match attr.oid {
                    CN => dn.common_name = value,
                    C => dn.country = Some(value),
                    O => dn.organization = Some(value),
                    OU => dn.organization_unit = Some(value),
                    _ => {}
                }
            }
        }

        Ok(dn)
    }
}

fn escape_rfc4514(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut escaped = String::with_capacity(value.len());
    for (i, ch) in value.chars().enumerate() {
        let leading = i == 0 && (ch == ' ' || ch == '#');
        let trailing = i == last && ch == ' ';
        if matches!(ch, ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=') || leading || trailing {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Certificate validity period.
///
/// Both bounds are fixed instants; nothing is derived from the generation time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    pub fn new(not_before: OffsetDateTime, not_after: OffsetDateTime) -> Result<Self, FixtureError> {
        if not_after <= not_before {
            return Err(FixtureError::InvalidInput(format!(
                "validity ends ({not_after}) before it starts ({not_before})"
            )));
        }
        Ok(Self {
            not_before,
            not_after,
        })
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(
        extension: E,
        critical: bool,
    ) -> Result<Self, FixtureError> {
        let value = extension.to_x509_extension_value()?;
        Ok(Self {
            oid: E::OID,
            critical,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn example_dn() -> DistinguishedName {
        DistinguishedName::builder()
            .common_name("ca01".to_string())
            .organization_unit("Example Org Unit".to_string())
            .organization("Example Org".to_string())
            .country("JP".to_string())
            .build()
    }

    #[test]
    fn test_name_rdn_order() {
        let name = example_dn().as_x509_name().unwrap();
        let oids: Vec<ObjectIdentifier> = name
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter().map(|attr| attr.oid))
            .collect();
        assert_eq!(oids, vec![C, O, OU, CN]);
    }

    #[test]
    fn test_name_skips_missing_attributes() {
        let dn = DistinguishedName::builder()
            .common_name("svr01".to_string())
            .build();
        let name = dn.as_x509_name().unwrap();
        assert_eq!(name.0.len(), 1);
        assert_eq!(DistinguishedName::from_x509_name(&name).unwrap(), dn);
    }

    #[test]
    fn test_name_decodes_all_attributes() {
        let dn = example_dn();
        let decoded = DistinguishedName::from_x509_name(&dn.as_x509_name().unwrap()).unwrap();
        assert_eq!(decoded, dn);
    }

    #[test]
    fn test_validity_rejects_inverted_window() {
        let start = datetime!(2022-01-01 0:00 UTC);
        let end = datetime!(2019-01-01 0:00 UTC);
        assert!(Validity::new(start, end).is_err());
        assert!(Validity::new(end, start).is_ok());
    }
}
