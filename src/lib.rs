//! # pki-fixtures - Self-Signed Test PKI Generator
//!
//! pki-fixtures builds the small certificate set that TLS and mTLS tests need,
//! entirely with rustcrypto libraries for keys and certificates. The PKCS#12
//! client bundle is sealed with OpenSSL.
//!
//! A run produces:
//!
//! | File           | Content                                                   |
//! |----------------|-----------------------------------------------------------|
//! | `ca01.crt`     | self-signed CA certificate (PEM)                          |
//! | `ca01.key`     | CA private key (PKCS#1 PEM)                               |
//! | `svr01.crt`    | server certificate for `svr01.example.org`, signed by the CA |
//! | `svr01.key`    | server private key (PKCS#1 PEM)                           |
//! | `client01.p12` | client key and certificate, PKCS#12, password `pincode`   |
//!
//! Subject names, serial numbers and the validity window are fixed, so two
//! runs differ only in key material and signatures.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pki_fixtures::fixture::{self, FixtureConfig};
//!
//! # fn main() -> Result<(), pki_fixtures::error::FixtureError> {
//! let config = FixtureConfig::builder()
//!     .output_dir("target/fixtures".into())
//!     .build();
//! let set = fixture::generate(&config)?;
//!
//! set.server.cert.verify_issued_by(&set.ca.cert)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Issuing a Certificate by Hand
//!
//! ```rust,no_run
//! use pki_fixtures::{
//!     cert::{
//!         Certificate, CertificateWithPrivateKey,
//!         extensions::{ExtendedKeyUsageOption, KeyUsages},
//!         params::{CertificationRequestInfo, DistinguishedName, Validity},
//!     },
//!     issuer::Issuer,
//!     key::{KeyPair, PublicKey},
//! };
//! use time::macros::datetime;
//!
//! # fn main() -> Result<(), pki_fixtures::error::FixtureError> {
//! let validity = Validity::new(datetime!(2019-01-01 0:00 UTC), datetime!(2022-01-01 0:00 UTC))?;
//!
//! let ca_key = KeyPair::generate_rsa(2048)?;
//! let ca_info = CertificationRequestInfo::builder()
//!     .serial_number(1)
//!     .subject(DistinguishedName::builder().common_name("ca01".to_string()).build())
//!     .subject_public_key(PublicKey::from_key_pair(&ca_key))
//!     .validity(validity.clone())
//!     .key_usage(KeyUsages::KeyCertSign | KeyUsages::CRLSign)
//!     .is_ca(true)
//!     .build();
//! let ca = CertificateWithPrivateKey {
//!     cert: Certificate::new_self_signed(&ca_info, &ca_key)?,
//!     key: ca_key,
//! };
//!
//! let server_key = KeyPair::generate_rsa(2048)?;
//! let server_info = CertificationRequestInfo::builder()
//!     .serial_number(123)
//!     .subject(DistinguishedName::builder().common_name("svr01".to_string()).build())
//!     .subject_public_key(PublicKey::from_key_pair(&server_key))
//!     .validity(validity)
//!     .key_usage(KeyUsages::DigitalSignature.into())
//!     .usages(vec![ExtendedKeyUsageOption::ServerAuth])
//!     .dns_names(vec!["svr01.example.org".to_string()])
//!     .build();
//! let server_cert = ca.issue(&server_info)?;
//! println!("{}", server_cert.to_pem()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`fixture`]: the fixture procedure and its configuration
//! - [`key`]: RSA key generation, PKCS#1 import/export, signing
//! - [`cert`]: certificate templates, extensions, encoding/decoding and verification
//! - [`issuer`]: certificate issuing
//! - [`archive`]: PKCS#12 sealing and opening
//! - [`output`]: checked file writes
//! - [`error`]: error types
//! - [`tbs_certificate`]: low-level certificate structure conversion

pub mod archive;
pub mod cert;
pub mod error;
pub mod fixture;
pub mod issuer;
pub mod key;
pub mod output;
pub mod pem_utils;
pub mod tbs_certificate;
