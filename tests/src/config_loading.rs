//! Security policy from YAML through to negotiated algorithms

use std::io::Write;

use integration_tests::{activated_amf_context, init_test_logging, TestResult, TestSubscriber, UePeer};
use nextgamf_common::{load_amf_config, load_amf_config_from_str, CipheringAlgorithm, Error, IntegrityAlgorithm, LogLevel};
use nextgamf_nas::{AlgorithmNegotiator, NasSecurityCodec, SecurityHeaderType};

const POLICY: &str = r#"
amfName: amf-integration
logLevel: debug
security:
  integrityOrder: [NIA2, NIA1]
  cipheringOrder: [NEA2, NEA0]
"#;

#[test]
fn test_policy_file_drives_negotiation() -> TestResult {
    init_test_logging();
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(POLICY.as_bytes())?;

    let config = load_amf_config(file.path())?;
    assert_eq!(config.amf_name, "amf-integration");
    assert_eq!(config.log_level, LogLevel::Debug);

    let negotiator = AlgorithmNegotiator::new(config.security);
    let subscriber = TestSubscriber::default();
    let selection = negotiator.negotiate(&subscriber.capability);
    assert_eq!(selection.integrity, IntegrityAlgorithm::Nia2);
    assert_eq!(selection.ciphering, CipheringAlgorithm::Nea2);

    // the negotiated pair is usable end to end
    let codec = NasSecurityCodec::new();
    let mut amf = activated_amf_context(&subscriber, selection)?;
    let mut ue = UePeer::new(&subscriber, selection)?;
    let pdu = codec.encode(
        &mut amf,
        SecurityHeaderType::IntegrityProtectedAndCiphered,
        vec![0x7E, 0x00, 0x54],
    )?;
    let received = ue.unprotect(&pdu)?;
    assert!(received.mac_valid);
    assert_eq!(received.plain, vec![0x7E, 0x00, 0x54]);
    Ok(())
}

#[test]
fn test_ue_capability_narrows_selection() -> TestResult {
    let config = load_amf_config_from_str(POLICY)?;
    let negotiator = AlgorithmNegotiator::new(config.security);

    // UE without EA2: falls to the next ciphering entry
    let subscriber = TestSubscriber::default().with_capability(0xC0, 0x60);
    let selection = negotiator.negotiate(&subscriber.capability);
    assert_eq!(selection.integrity, IntegrityAlgorithm::Nia2);
    assert_eq!(selection.ciphering, CipheringAlgorithm::Nea0);
    Ok(())
}

#[test]
fn test_no_common_algorithm_falls_back_to_null() -> TestResult {
    let config = load_amf_config_from_str(
        r#"
amfName: amf-strict
security:
  integrityOrder: [NIA3]
  cipheringOrder: [NEA3]
"#,
    )?;
    let negotiator = AlgorithmNegotiator::new(config.security);
    let subscriber = TestSubscriber::default().with_capability(0xE0, 0xE0);
    let selection = negotiator.negotiate(&subscriber.capability);
    assert_eq!(selection.integrity, IntegrityAlgorithm::Nia0);
    assert_eq!(selection.ciphering, CipheringAlgorithm::Nea0);
    assert!(selection.is_null_integrity());
    assert!(selection.is_null_ciphering());
    Ok(())
}

#[test]
fn test_defaults_apply_when_security_is_omitted() -> TestResult {
    let config = load_amf_config_from_str("amfName: amf-defaults\n")?;
    assert_eq!(
        config.security.integrity_order,
        vec![IntegrityAlgorithm::Nia2, IntegrityAlgorithm::Nia1, IntegrityAlgorithm::Nia3]
    );
    assert_eq!(config.security.ciphering_order[0], CipheringAlgorithm::Nea0);
    Ok(())
}

#[test]
fn test_invalid_policies_are_rejected() {
    let duplicate = r#"
amfName: amf
security:
  integrityOrder: [NIA2, NIA2]
  cipheringOrder: [NEA0]
"#;
    assert!(matches!(load_amf_config_from_str(duplicate), Err(Error::Config(_))));

    let unknown = r#"
amfName: amf
security:
  integrityOrder: [NIA9]
  cipheringOrder: [NEA0]
"#;
    assert!(matches!(load_amf_config_from_str(unknown), Err(Error::YamlParse(_))));

    assert!(matches!(
        load_amf_config("/nonexistent/amf.yaml"),
        Err(Error::Io(_))
    ));
}
