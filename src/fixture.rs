//! The fixture procedure: a self-signed CA, a server certificate and a
//! PKCS#12 client bundle, issued and written in that order.

use std::path::{Path, PathBuf};

use bon::Builder;
use log::info;
use time::macros::datetime;

use crate::archive;
use crate::cert::extensions::{ExtendedKeyUsageOption, KeyUsages};
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, Validity};
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::Result;
use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};
use crate::output::write_file;
use crate::pem_utils::{self, CERTIFICATE_LABEL, RSA_PRIVATE_KEY_LABEL};

pub const DEFAULT_KEY_BITS: usize = 2048;
pub const DEFAULT_ARCHIVE_PASSWORD: &str = "pincode";

/// Per-identity parameters.
#[derive(Clone, Debug, Builder)]
pub struct IdentityConfig {
    /// Common name; also the stem of the identity's output files.
    pub common_name: String,
    pub serial_number: u64,
    #[builder(default)]
    pub dns_names: Vec<String>,
}

/// Every literal the fixture procedure uses.
///
/// `FixtureConfig::default()` yields the standard set: `ca01` (serial 1),
/// `svr01` (serial 123, `svr01.example.org`) and `client01` (serial 456), all
/// under `OU=Example Org Unit, O=Example Org, C=JP`, valid from 2019-01-01 to
/// 2022-01-01 UTC, with 2048-bit RSA keys and the archive password `pincode`.
#[derive(Clone, Debug, Builder)]
pub struct FixtureConfig {
    #[builder(default = PathBuf::from("."))]
    pub output_dir: PathBuf,
    #[builder(default = DEFAULT_KEY_BITS)]
    pub key_bits: usize,
    #[builder(default = default_validity())]
    pub validity: Validity,
    #[builder(default = "Example Org Unit".to_string())]
    pub organization_unit: String,
    #[builder(default = "Example Org".to_string())]
    pub organization: String,
    #[builder(default = "JP".to_string())]
    pub country: String,
    #[builder(default = IdentityConfig::builder().common_name("ca01".to_string()).serial_number(1).build())]
    pub ca: IdentityConfig,
    #[builder(default = IdentityConfig::builder()
        .common_name("svr01".to_string())
        .serial_number(123)
        .dns_names(vec!["svr01.example.org".to_string()])
        .build())]
    pub server: IdentityConfig,
    #[builder(default = IdentityConfig::builder().common_name("client01".to_string()).serial_number(456).build())]
    pub client: IdentityConfig,
    #[builder(default = DEFAULT_ARCHIVE_PASSWORD.to_string())]
    pub archive_password: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_validity() -> Validity {
    Validity {
        not_before: datetime!(2019-01-01 0:00 UTC),
        not_after: datetime!(2022-01-01 0:00 UTC),
    }
}

impl FixtureConfig {
    /// Subject name for one identity, sharing the configured OU, O and C.
    pub fn subject(&self, identity: &IdentityConfig) -> DistinguishedName {
        DistinguishedName::builder()
            .common_name(identity.common_name.clone())
            .organization_unit(self.organization_unit.clone())
            .organization(self.organization.clone())
            .country(self.country.clone())
            .build()
    }

    pub fn certificate_path(&self, identity: &IdentityConfig) -> PathBuf {
        self.output_path(identity, "crt")
    }

    pub fn key_path(&self, identity: &IdentityConfig) -> PathBuf {
        self.output_path(identity, "key")
    }

    pub fn archive_path(&self, identity: &IdentityConfig) -> PathBuf {
        self.output_path(identity, "p12")
    }

    fn output_path(&self, identity: &IdentityConfig, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{extension}", identity.common_name))
    }
}

/// The identities produced by one run, and the files written for them.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    pub ca: CertificateWithPrivateKey,
    pub server: CertificateWithPrivateKey,
    pub client: CertificateWithPrivateKey,
    pub files: Vec<PathBuf>,
}

fn generate_key(config: &FixtureConfig, identity: &IdentityConfig) -> Result<KeyPair> {
    let key = KeyPair::generate_rsa(config.key_bits)?;
    info!(
        "generated {}-bit RSA key for {}",
        key.bits(),
        identity.common_name
    );
    Ok(key)
}

/// Generates the CA key and its self-signed certificate.
///
/// Key usage is digitalSignature, keyCertSign and cRLSign.
pub fn issue_ca(config: &FixtureConfig) -> Result<CertificateWithPrivateKey> {
    let key = generate_key(config, &config.ca)?;
    let cert_info = CertificationRequestInfo::builder()
        .serial_number(config.ca.serial_number)
        .subject(config.subject(&config.ca))
        .subject_public_key(PublicKey::from_key_pair(&key))
        .validity(config.validity.clone())
        .key_usage(KeyUsages::DigitalSignature | KeyUsages::KeyCertSign | KeyUsages::CRLSign)
        .dns_names(config.ca.dns_names.clone())
        .is_ca(true)
        .build();

    let cert = Certificate::new_self_signed(&cert_info, &key)?;
    info!(
        "issued self-signed CA certificate {} (serial {})",
        config.ca.common_name, config.ca.serial_number
    );
    Ok(CertificateWithPrivateKey { cert, key })
}

/// Generates the server key and a serverAuth certificate signed by `ca`.
pub fn issue_server(
    config: &FixtureConfig,
    ca: &CertificateWithPrivateKey,
) -> Result<CertificateWithPrivateKey> {
    let key = generate_key(config, &config.server)?;
    let cert_info = CertificationRequestInfo::builder()
        .serial_number(config.server.serial_number)
        .subject(config.subject(&config.server))
        .subject_public_key(PublicKey::from_key_pair(&key))
        .validity(config.validity.clone())
        .key_usage(KeyUsages::DigitalSignature.into())
        .usages(vec![ExtendedKeyUsageOption::ServerAuth])
        .dns_names(config.server.dns_names.clone())
        .build();

    let cert = ca.issue(&cert_info)?;
    info!(
        "issued server certificate {} (serial {}) for {:?}",
        config.server.common_name, config.server.serial_number, config.server.dns_names
    );
    Ok(CertificateWithPrivateKey { cert, key })
}

/// Generates the client key and a clientAuth certificate signed by `ca`.
///
/// The returned certificate is the DER encoding parsed back, which is what
/// gets packaged into the archive.
pub fn issue_client(
    config: &FixtureConfig,
    ca: &CertificateWithPrivateKey,
) -> Result<CertificateWithPrivateKey> {
    let key = generate_key(config, &config.client)?;
    let cert_info = CertificationRequestInfo::builder()
        .serial_number(config.client.serial_number)
        .subject(config.subject(&config.client))
        .subject_public_key(PublicKey::from_key_pair(&key))
        .validity(config.validity.clone())
        .key_usage(KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment)
        .usages(vec![ExtendedKeyUsageOption::ClientAuth])
        .dns_names(config.client.dns_names.clone())
        .build();

    let der = ca.issue(&cert_info)?.to_der()?;
    let cert = Certificate::from_der(&der)?;
    info!(
        "issued client certificate {} (serial {})",
        config.client.common_name, config.client.serial_number
    );
    Ok(CertificateWithPrivateKey { cert, key })
}

/// Writes the certificate and PKCS#1 private key of one identity as PEM.
pub fn write_pem_pair(
    config: &FixtureConfig,
    identity: &IdentityConfig,
    issued: &CertificateWithPrivateKey,
) -> Result<[PathBuf; 2]> {
    let cert_path = config.certificate_path(identity);
    let cert_pem = pem_utils::der_to_pem(&issued.cert.to_der()?, CERTIFICATE_LABEL);
    write_file(&cert_path, cert_pem.as_bytes())?;

    let key_path = config.key_path(identity);
    let key_pem = pem_utils::der_to_pem(&issued.key.to_pkcs1_der()?, RSA_PRIVATE_KEY_LABEL);
    write_file(&key_path, key_pem.as_bytes())?;

    Ok([cert_path, key_path])
}

/// Seals the client key and certificate with the configured password and writes the archive.
pub fn write_archive(
    config: &FixtureConfig,
    identity: &IdentityConfig,
    issued: &CertificateWithPrivateKey,
) -> Result<PathBuf> {
    let der = archive::seal(
        &identity.common_name,
        &issued.key,
        &issued.cert,
        &config.archive_password,
    )?;
    let path = config.archive_path(identity);
    write_file(&path, &der)?;
    Ok(path)
}

/// Runs the whole procedure, stopping at the first error.
///
/// Files already written stay on disk when a later step fails.
pub fn generate(config: &FixtureConfig) -> Result<FixtureSet> {
    info!("generating fixture set in {}", display_dir(&config.output_dir));
    let mut files = Vec::with_capacity(5);

    let ca = issue_ca(config)?;
    files.extend(write_pem_pair(config, &config.ca, &ca)?);

    let server = issue_server(config, &ca)?;
    files.extend(write_pem_pair(config, &config.server, &server)?);

    let client = issue_client(config, &ca)?;
    files.push(write_archive(config, &config.client, &client)?);

    Ok(FixtureSet {
        ca,
        server,
        client,
        files,
    })
}

fn display_dir(dir: &Path) -> String {
    match dir.to_str() {
        Some(".") | Some("") => "the current directory".to_string(),
        _ => dir.display().to_string(),
    }
}
