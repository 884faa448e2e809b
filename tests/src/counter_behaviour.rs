//! NAS COUNT behaviour across many messages

use integration_tests::test_fixtures::{registration_accept, ul_nas_transport};
use integration_tests::{activated_amf_context, init_test_logging, TestResult, TestSubscriber, UePeer};
use nextgamf_common::{AccessType, CipheringAlgorithm, IntegrityAlgorithm};
use nextgamf_nas::{NasCount, NasSecurityCodec, NasSecuritySelection, SecurityHeaderType};
use proptest::prelude::*;

const SELECTION: NasSecuritySelection = NasSecuritySelection {
    integrity: IntegrityAlgorithm::Nia2,
    ciphering: CipheringAlgorithm::Nea2,
};

fn send_downlink(n: usize) -> TestResult<NasCount> {
    let codec = NasSecurityCodec::new();
    let mut amf = activated_amf_context(&TestSubscriber::default(), SELECTION)?;
    for _ in 0..n {
        codec.encode(
            &mut amf,
            SecurityHeaderType::IntegrityProtectedAndCiphered,
            registration_accept(),
        )?;
    }
    Ok(amf.dl_count())
}

#[test]
fn test_dl_count_below_256() -> TestResult {
    for n in [0usize, 1, 2, 100, 255] {
        let count = send_downlink(n)?;
        assert_eq!(count.packed(), n as u32);
        assert_eq!(count.overflow, 0);
    }
    Ok(())
}

#[test]
fn test_dl_count_after_sqn_wrap() -> TestResult {
    for n in [256usize, 257, 300, 511] {
        let count = send_downlink(n)?;
        assert_eq!(count.overflow, 1);
        assert_eq!(usize::from(count.sqn), n - 256);
    }
    Ok(())
}

#[test]
fn test_ue_follows_downlink_across_wrap() -> TestResult {
    init_test_logging();
    let subscriber = TestSubscriber::default();
    let codec = NasSecurityCodec::new();
    let mut amf = activated_amf_context(&subscriber, SELECTION)?;
    let mut ue = UePeer::new(&subscriber, SELECTION)?;

    for _ in 0..260 {
        let pdu = codec.encode(
            &mut amf,
            SecurityHeaderType::IntegrityProtectedAndCiphered,
            registration_accept(),
        )?;
        let received = ue.unprotect(&pdu)?;
        assert!(received.mac_valid);
        assert_eq!(received.plain, registration_accept());
    }
    assert_eq!(ue.dl_count(), NasCount::new(1, 3));
    Ok(())
}

#[test]
fn test_uplink_wrap_is_accepted() -> TestResult {
    init_test_logging();
    let subscriber = TestSubscriber::default();
    let codec = NasSecurityCodec::new();
    let mut amf = activated_amf_context(&subscriber, SELECTION)?;
    let mut ue = UePeer::new(&subscriber, SELECTION)?;

    amf.set_ul_count(NasCount::new(0, 250));
    // messages 251..=260 were lost; the UE is now at sqn 5 after the wrap
    ue.set_ul_count(NasCount::new(1, 5));

    let pdu = ue.protect(SecurityHeaderType::IntegrityProtectedAndCiphered, ul_nas_transport())?;
    let decoded = codec.decode(
        &mut amf,
        AccessType::ThreeGpp,
        SecurityHeaderType::IntegrityProtectedAndCiphered,
        None,
        pdu,
    )?;
    assert_eq!(amf.ul_count(), NasCount::new(1, 5));
    assert!(!decoded.mac_failed);
    assert_eq!(decoded.message.bytes, ul_nas_transport());
    Ok(())
}

#[test]
fn test_uplink_replay_is_flagged() -> TestResult {
    init_test_logging();
    let subscriber = TestSubscriber::default();
    let codec = NasSecurityCodec::new();
    let mut amf = activated_amf_context(&subscriber, SELECTION)?;
    let mut ue = UePeer::new(&subscriber, SELECTION)?;

    ue.set_ul_count(NasCount::new(0, 5));
    let old = ue.protect(SecurityHeaderType::IntegrityProtected, ul_nas_transport())?;

    amf.set_ul_count(NasCount::new(0, 250));
    let decoded = codec.decode(
        &mut amf,
        AccessType::ThreeGpp,
        SecurityHeaderType::IntegrityProtected,
        None,
        old,
    )?;
    // sqn 5 below 250 reads as a wrap, and the MAC disagrees
    assert_eq!(decoded.count, NasCount::new(1, 5));
    assert!(decoded.mac_failed);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_in_order_uplink_always_verifies(start in 0u32..0x0000_FF00, n in 1usize..300) {
        let subscriber = TestSubscriber::default();
        let codec = NasSecurityCodec::new();
        let mut amf = activated_amf_context(&subscriber, SELECTION).unwrap();
        let mut ue = UePeer::new(&subscriber, SELECTION).unwrap();

        let start = NasCount::from_packed(start);
        amf.set_ul_count(start);
        ue.set_ul_count(start);

        for _ in 0..n {
            let pdu = ue
                .protect(SecurityHeaderType::IntegrityProtectedAndCiphered, ul_nas_transport())
                .unwrap();
            let decoded = codec
                .decode(
                    &mut amf,
                    AccessType::ThreeGpp,
                    SecurityHeaderType::IntegrityProtectedAndCiphered,
                    None,
                    pdu,
                )
                .unwrap();
            prop_assert!(!decoded.mac_failed);
        }
        prop_assert_eq!(amf.ul_count().packed(), start.packed() + n as u32 - 1);
    }
}
