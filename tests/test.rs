mod util;

use std::fs;
use std::path::Path;
use std::process::Command;

use pki_fixtures::archive;
use pki_fixtures::cert::Certificate;
use pki_fixtures::cert::extensions::{
    ExtendedKeyUsage, ExtendedKeyUsageOption, FlagSet, KeyUsage, KeyUsages, SubjectAltName,
};
use pki_fixtures::error::FixtureError;
use pki_fixtures::fixture::{self, FixtureConfig};
use pki_fixtures::key::KeyPair;
use time::macros::datetime;

fn listed_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn read_cert(dir: &Path, name: &str) -> Certificate {
    Certificate::from_pem(&fs::read_to_string(dir.join(name)).unwrap()).unwrap()
}

/// The procedure writes exactly the five fixture files.
#[test]
fn generate_writes_fixture_files() {
    let (dir, _config, set) = util::generate_fixture_set();

    assert_eq!(listed_files(dir.path()), util::FIXTURE_FILES);
    assert_eq!(set.files.len(), 5);
    for file in &set.files {
        assert!(file.starts_with(dir.path()));
    }
}

/// The CA certificate on disk is self-signed and flagged as a CA.
#[test]
fn ca_certificate_is_self_signed() {
    let (dir, _config, set) = util::generate_fixture_set();
    let ca = read_cert(dir.path(), "ca01.crt");

    assert_eq!(ca.issuer().unwrap(), ca.subject().unwrap());
    assert!(ca.is_self_signed().unwrap());
    assert!(ca.is_ca().unwrap());
    assert_eq!(ca.serial_number().unwrap(), 1);

    let subject = ca.subject().unwrap();
    assert_eq!(subject.common_name, "ca01");
    assert_eq!(subject.organization_unit.as_deref(), Some("Example Org Unit"));
    assert_eq!(subject.organization.as_deref(), Some("Example Org"));
    assert_eq!(subject.country.as_deref(), Some("JP"));

    let key_usage = ca.extension::<KeyUsage>().unwrap().unwrap();
    assert_eq!(
        key_usage.0,
        KeyUsages::DigitalSignature | KeyUsages::KeyCertSign | KeyUsages::CRLSign
    );

    let key = KeyPair::import_from_pkcs1_pem(&fs::read_to_string(dir.path().join("ca01.key")).unwrap())
        .unwrap();
    assert_eq!(key.public_key(), ca.public_key().unwrap());
    assert_eq!(key.public_key(), set.ca.key.public_key());
}

/// The server certificate names the CA as issuer and verifies under its key.
#[test]
fn server_certificate_is_signed_by_ca() {
    let (dir, _config, _set) = util::generate_fixture_set();
    let ca = read_cert(dir.path(), "ca01.crt");
    let server = read_cert(dir.path(), "svr01.crt");

    assert_eq!(server.issuer().unwrap(), ca.subject().unwrap());
    server.verify_issued_by(&ca).unwrap();
    assert!(!server.is_ca().unwrap());
    assert_eq!(server.serial_number().unwrap(), 123);

    let san = server.extension::<SubjectAltName>().unwrap().unwrap();
    assert_eq!(san.names, vec!["svr01.example.org".to_string()]);
    let eku = server.extension::<ExtendedKeyUsage>().unwrap().unwrap();
    assert_eq!(eku.usage, vec![ExtendedKeyUsageOption::ServerAuth]);
    let key_usage = server.extension::<KeyUsage>().unwrap().unwrap();
    assert_eq!(key_usage.0, FlagSet::from(KeyUsages::DigitalSignature));

    let validity = server.validity().unwrap();
    assert_eq!(validity.not_before, datetime!(2019-01-01 0:00 UTC));
    assert_eq!(validity.not_after, datetime!(2022-01-01 0:00 UTC));

    let key = KeyPair::import_from_pkcs1_pem(&fs::read_to_string(dir.path().join("svr01.key")).unwrap())
        .unwrap();
    assert_eq!(key.public_key(), server.public_key().unwrap());
}

/// The client archive opens with the fixed password only.
#[test]
fn client_archive_opens_with_password() {
    let (dir, config, set) = util::generate_fixture_set();
    let der = fs::read(dir.path().join("client01.p12")).unwrap();

    let contents = archive::open(&der, &config.archive_password).unwrap();
    assert_eq!(contents.key.public_key(), contents.cert.public_key().unwrap());
    assert_eq!(contents.key.public_key(), set.client.key.public_key());
    contents.cert.verify_issued_by(&set.ca.cert).unwrap();
    assert_eq!(contents.cert.serial_number().unwrap(), 456);
    assert_eq!(contents.cert.subject().unwrap().common_name, "client01");

    let eku = contents.cert.extension::<ExtendedKeyUsage>().unwrap().unwrap();
    assert_eq!(eku.usage, vec![ExtendedKeyUsageOption::ClientAuth]);
    let key_usage = contents.cert.extension::<KeyUsage>().unwrap().unwrap();
    assert_eq!(
        key_usage.0,
        KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment
    );
    assert!(contents.cert.extension::<SubjectAltName>().unwrap().is_none());

    assert!(matches!(
        archive::open(&der, "not-the-pincode"),
        Err(FixtureError::ArchiveError(_))
    ));
}

/// Every key in the set has the same fixed size.
#[test]
fn keys_are_2048_bits() {
    let (_dir, _config, set) = util::generate_fixture_set();
    for identity in [&set.ca, &set.server, &set.client] {
        assert_eq!(identity.key.bits(), 2048);
        assert_eq!(identity.cert.public_key().unwrap().bits(), 2048);
    }
}

/// A second run into the same directory keeps names and dates but replaces keys.
#[test]
fn rerun_overwrites_with_fresh_keys() {
    let (dir, config, first) = util::generate_fixture_set();
    let first_ca_pem = fs::read_to_string(dir.path().join("ca01.crt")).unwrap();

    let second = fixture::generate(&config).unwrap();
    let second_ca_pem = fs::read_to_string(dir.path().join("ca01.crt")).unwrap();
    assert_ne!(first_ca_pem, second_ca_pem);
    assert_eq!(listed_files(dir.path()), util::FIXTURE_FILES);

    for (a, b) in [
        (&first.ca, &second.ca),
        (&first.server, &second.server),
        (&first.client, &second.client),
    ] {
        assert_eq!(a.cert.subject().unwrap(), b.cert.subject().unwrap());
        assert_eq!(a.cert.validity().unwrap(), b.cert.validity().unwrap());
        assert_ne!(a.key.public_key(), b.key.public_key());
        assert_ne!(a.cert.inner.signature, b.cert.inner.signature);
    }

    // The old CA does not vouch for the new server certificate.
    assert!(second.server.cert.verify_issued_by(&first.ca.cert).is_err());
}

/// Running the binary in an empty directory leaves exactly the fixture files behind.
#[test]
fn binary_writes_into_current_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_pki-fixtures"))
        .current_dir(dir.path())
        .output()
        .expect("Failed to run pki-fixtures");

    assert!(
        output.status.success(),
        "pki-fixtures failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(listed_files(dir.path()), util::FIXTURE_FILES);
}

/// A write failure stops the binary with a nonzero status.
#[cfg(unix)]
#[test]
fn binary_fails_in_read_only_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
    // Root ignores directory permissions; nothing to observe then.
    if fs::File::create(dir.path().join("writable")).is_ok() {
        return;
    }

    let output = Command::new(env!("CARGO_BIN_EXE_pki-fixtures"))
        .current_dir(dir.path())
        .output()
        .expect("Failed to run pki-fixtures");

    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ca01.crt"));
}

/// The procedure stops at the first failed write and reports which file it was.
#[test]
fn generate_stops_at_first_create_failure() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-directory");
    fs::write(&blocker, b"regular file").unwrap();

    let config = FixtureConfig::builder()
        .output_dir(blocker.join("sub"))
        .build();

    match fixture::generate(&config) {
        Err(FixtureError::FileCreateError { path, .. }) => assert!(path.ends_with("ca01.crt")),
        other => panic!("expected create error for ca01.crt, got {other:?}"),
    }
    assert_eq!(listed_files(dir.path()), vec!["not-a-directory".to_string()]);
    for name in util::FIXTURE_FILES {
        assert!(!blocker.join("sub").join(name).exists());
    }
}
