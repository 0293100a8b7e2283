//! Integration tests for the save-before-QR ordering guarantee.

mod common;

use common::{RecordingPrinter, RecordingSharer, SAVED_URL, booth, grid4_session, photo_source, saved_response};
use cutprint_app::{FinalImage, FinishOutcome, Notice, QrGate, QrWithoutSave};
use cutprint_core::Visibility;
use cutprint_print::{PrintOutcome, ShareOutcome};

fn ready(outcome: FinishOutcome) -> cutprint_app::Finished {
    match outcome {
        FinishOutcome::Ready(finished) => finished,
        FinishOutcome::SaveRequired => panic!("expected a finished image"),
    }
}

#[test]
fn qr_ordering_tests_degrades_to_no_qr_before_save() {
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Ok(PrintOutcome::Completed)),
        RecordingSharer::new(Ok(ShareOutcome::Shared)),
    );
    let mut session = grid4_session();
    session.request_qr(true);

    let finished = ready(booth.finish(&session));

    assert_eq!(finished.notices, vec![Notice::QrOmittedUntilSaved]);
    assert!(!finished.image.has_qr());
}

#[test]
fn qr_ordering_tests_prompt_policy_asks_to_save_first() {
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Ok(PrintOutcome::Completed)),
        RecordingSharer::new(Ok(ShareOutcome::Shared)),
    )
    .with_qr_policy(QrWithoutSave::Prompt);
    let mut session = grid4_session();
    session.request_qr(true);

    assert_eq!(session.qr_gate(QrWithoutSave::Prompt), QrGate::SaveRequired);
    assert_eq!(booth.finish(&session), FinishOutcome::SaveRequired);
}

#[test]
fn qr_ordering_tests_saved_url_becomes_qr_payload() {
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Ok(PrintOutcome::Completed)),
        RecordingSharer::new(Ok(ShareOutcome::Shared)),
    )
    .with_api(common::api(vec![saved_response()]));
    let mut session = grid4_session();
    session.request_qr(true);

    let draft = ready(booth.finish(&session));
    let report = booth
        .save_to_album(&mut session, &draft.image, Visibility::AllFriends, None)
        .expect("save succeeds");
    assert_eq!(report.saved.url, SAVED_URL);
    assert_eq!(session.qr_gate(QrWithoutSave::Degrade), QrGate::Ready(SAVED_URL.to_string()));

    let finished = ready(booth.finish(&session));
    assert!(finished.notices.is_empty());
    let FinalImage::Composed(image) = &finished.image else {
        panic!("expected composed image");
    };
    let placement = image.qr_placement.expect("qr drawn");
    assert!(placement.fits_within(image.width, image.height));
}

#[test]
fn qr_ordering_tests_blank_saved_url_is_never_encoded() {
    let mut session = grid4_session();
    session.request_qr(true);
    session.record_save(cutprint_core::SavedPhoto {
        id: 7,
        url: "  ".to_string(),
    });

    assert_eq!(session.qr_gate(QrWithoutSave::Degrade), QrGate::Degraded);
    let request = session.composition_request(&session.qr_gate(QrWithoutSave::Degrade), Default::default());
    assert_eq!(request.qr_payload, None);
}

#[test]
fn qr_ordering_tests_save_without_api_is_rejected() {
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Ok(PrintOutcome::Completed)),
        RecordingSharer::new(Ok(ShareOutcome::Shared)),
    );
    let mut session = grid4_session();
    let draft = ready(booth.finish(&session));

    assert!(booth.save_to_album(&mut session, &draft.image, Visibility::Private, None).is_err());
    assert!(session.saved().is_none());
}

#[test]
fn qr_ordering_tests_restyle_after_save_withdraws_payload() {
    let catalog = cutprint_catalog::global();
    let mut session = grid4_session();
    session.request_qr(true);
    session.record_save(cutprint_core::SavedPhoto {
        id: 42,
        url: SAVED_URL.to_string(),
    });

    session.select_filter(catalog, "original").expect("filter exists");
    session.set_label("").expect("label fits");
    assert_eq!(session.qr_gate(QrWithoutSave::Degrade), QrGate::Ready(SAVED_URL.to_string()));

    session.select_filter(catalog, "bw_noir").expect("filter exists");
    assert!(session.saved().is_none());
    assert_eq!(session.qr_gate(QrWithoutSave::Degrade), QrGate::Degraded);
    assert_eq!(session.qr_gate(QrWithoutSave::Prompt), QrGate::SaveRequired);

    session.record_save(cutprint_core::SavedPhoto {
        id: 43,
        url: SAVED_URL.to_string(),
    });
    session.select_frame(catalog, "classic_white").expect("frame exists");
    assert_eq!(session.qr_gate(QrWithoutSave::Degrade), QrGate::Degraded);

    session.record_save(cutprint_core::SavedPhoto {
        id: 44,
        url: SAVED_URL.to_string(),
    });
    session.set_label("PARTY").expect("label fits");
    assert_eq!(session.qr_gate(QrWithoutSave::Degrade), QrGate::Degraded);
}
