//! Tests classifier scenarios and the kind-to-action table.

use cutprint_recovery::{ErrorKind, RecoveryAction, classify, decide, recovery_action};
use proptest::prelude::*;

#[test]
fn classifier_scenario_tests_printing_did_not_complete_is_silent() {
    let kind = classify("Printing did not complete");
    assert_eq!(kind, ErrorKind::UserCancelled);
    assert_eq!(recovery_action(kind), RecoveryAction::Silent);
}

#[test]
fn classifier_scenario_tests_action_table() {
    let expected = [
        (ErrorKind::UserCancelled, RecoveryAction::Silent),
        (ErrorKind::SecurityPolicy, RecoveryAction::OfferShareFallback),
        (ErrorKind::PrinterUnavailable, RecoveryAction::OfferRetry),
        (ErrorKind::OutOfMemory, RecoveryAction::OfferShareFallback),
        (ErrorKind::NetworkUnavailable, RecoveryAction::OfferRetry),
        (ErrorKind::FileError, RecoveryAction::Terminal),
        (ErrorKind::Unknown, RecoveryAction::OfferRetry),
    ];
    assert_eq!(expected.len(), ErrorKind::ALL.len());
    for (kind, action) in expected {
        assert_eq!(recovery_action(kind), action, "{kind:?}");
    }
}

#[test]
fn classifier_scenario_tests_platform_messages() {
    let cases = [
        ("Operation not permitted by security policy", ErrorKind::SecurityPolicy),
        ("No printer available on this network", ErrorKind::PrinterUnavailable),
        ("Out of memory while rendering page", ErrorKind::OutOfMemory),
        ("The Internet connection appears to be offline.", ErrorKind::NetworkUnavailable),
        ("ENOENT: no such file or directory", ErrorKind::FileError),
        ("Share sheet dismissed", ErrorKind::UserCancelled),
    ];
    for (message, kind) in cases {
        assert_eq!(classify(message), kind, "{message}");
    }
    assert_eq!(decide("ENOENT").action, RecoveryAction::Terminal);
}

proptest! {
    #[test]
    fn classifier_scenario_tests_every_message_has_an_action(message in ".{0,64}") {
        let decision = decide(&message);
        prop_assert_eq!(decision.action, recovery_action(decision.kind));
        prop_assert_eq!(decision.message.is_none(), decision.action == RecoveryAction::Silent);
    }
}
