//! Integration tests for print and share flows through the recovery policy.

mod common;

use common::{RecordingPrinter, RecordingSharer, booth, grid4_session, photo_source, solid_png};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cutprint_app::{FinalImage, FlowOutcome};
use cutprint_compose::{ComposedImage, OutputFormat};
use cutprint_core::QrPlacement;
use cutprint_print::{CollaboratorError, Orientation, PrintDocument, PrintOutcome, ShareOutcome};
use cutprint_recovery::{ErrorKind, RecoveryAction};

fn composed_with_qr() -> FinalImage {
    FinalImage::Composed(ComposedImage {
        bytes: solid_png(8, 8, [255, 255, 255, 255]),
        format: OutputFormat::Png,
        width: 8,
        height: 8,
        qr_placement: Some(QrPlacement { x: 4, y: 4, size_px: 3 }),
    })
}

fn original() -> FinalImage {
    FinalImage::Original {
        uri: "file:///photos/shot.jpg".to_string(),
    }
}

#[test]
fn print_share_flow_tests_qr_image_prints_composed_document() {
    let printer = RecordingPrinter::new(Ok(PrintOutcome::Completed));
    let booth = booth(photo_source(), printer.clone(), RecordingSharer::new(Ok(ShareOutcome::Shared)));

    let outcome = booth.print(&composed_with_qr(), "Booth & Co", Orientation::Landscape);

    assert_eq!(outcome, FlowOutcome::Completed);
    let documents = printer.documents();
    let [PrintDocument::Composed { html, orientation }] = documents.as_slice() else {
        panic!("expected one composed document");
    };
    assert_eq!(*orientation, Orientation::Landscape);
    assert!(html.contains("Booth &amp; Co"));
    assert!(html.contains("data:image/png;base64,"));
}

#[test]
fn print_share_flow_tests_original_prints_directly() {
    let printer = RecordingPrinter::new(Ok(PrintOutcome::Completed));
    let booth = booth(photo_source(), printer.clone(), RecordingSharer::new(Ok(ShareOutcome::Shared)));

    booth.print(&original(), "", Orientation::Portrait);

    assert_eq!(
        printer.documents(),
        vec![PrintDocument::Direct {
            image_uri: "file:///photos/shot.jpg".to_string(),
            orientation: Orientation::Portrait,
        }]
    );
}

#[test]
fn print_share_flow_tests_dismissed_dialog_is_silent() {
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Err(CollaboratorError::new("Printing did not complete"))),
        RecordingSharer::new(Ok(ShareOutcome::Shared)),
    );
    assert_eq!(booth.print(&original(), "", Orientation::Portrait), FlowOutcome::Cancelled);

    let booth = common::booth(
        photo_source(),
        RecordingPrinter::new(Ok(PrintOutcome::Cancelled)),
        RecordingSharer::new(Ok(ShareOutcome::Dismissed)),
    );
    assert_eq!(booth.print(&original(), "", Orientation::Portrait), FlowOutcome::Cancelled);
    assert_eq!(booth.share(&original(), "Share"), FlowOutcome::Cancelled);
}

#[test]
fn print_share_flow_tests_security_failure_shares_composite_without_qr() {
    let sharer = RecordingSharer::new(Ok(ShareOutcome::Shared));
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Err(CollaboratorError::new("Blocked by security policy"))),
        sharer.clone(),
    );
    let session = grid4_session();

    let report = booth.print_with_fallback(&session, &composed_with_qr(), "Share", Orientation::Portrait);

    let FlowOutcome::Failed(decision) = &report.print else {
        panic!("print should fail");
    };
    assert_eq!(decision.kind, ErrorKind::SecurityPolicy);
    assert_eq!(decision.action, RecoveryAction::OfferShareFallback);
    assert_eq!(report.fallback_share, Some(FlowOutcome::Completed));

    let requests = sharer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].uti, "public.png");
    let encoded = requests[0]
        .uri
        .strip_prefix("data:image/png;base64,")
        .expect("composite shared as data uri");
    let shared = image::load_from_memory(&STANDARD.decode(encoded).expect("base64 payload")).expect("png decodes");
    assert_eq!((shared.width(), shared.height()), (200, 200));
}

#[test]
fn print_share_flow_tests_fallback_uses_original_only_after_failed_composition() {
    let sharer = RecordingSharer::new(Ok(ShareOutcome::Shared));
    let booth = booth(
        cutprint_compose::MemorySource::new(),
        RecordingPrinter::new(Err(CollaboratorError::new("Out of memory"))),
        sharer.clone(),
    );

    let report = booth.print_with_fallback(&grid4_session(), &composed_with_qr(), "Share", Orientation::Portrait);
    assert_eq!(report.fallback_share, Some(FlowOutcome::Completed));
    assert_eq!(sharer.requests()[0].uri, "mem://photo-0");

    let report = booth.print_with_fallback(&grid4_session(), &original(), "Share", Orientation::Portrait);
    assert_eq!(report.fallback_share, Some(FlowOutcome::Completed));
    assert_eq!(sharer.requests()[1].uri, "file:///photos/shot.jpg");
}

#[test]
fn print_share_flow_tests_composed_document_honours_margin() {
    let printer = RecordingPrinter::new(Ok(PrintOutcome::Completed));
    let booth = booth(photo_source(), printer.clone(), RecordingSharer::new(Ok(ShareOutcome::Shared)))
        .with_print_margin(10);

    booth.print(&composed_with_qr(), "Margins", Orientation::Portrait);

    let documents = printer.documents();
    let [PrintDocument::Composed { html, .. }] = documents.as_slice() else {
        panic!("expected one composed document");
    };
    assert!(html.contains("@page { size: A4 portrait; margin: 10mm; }"));
}

#[test]
fn print_share_flow_tests_printer_failure_offers_retry_only() {
    let sharer = RecordingSharer::new(Ok(ShareOutcome::Shared));
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Err(CollaboratorError::new("Printer is offline"))),
        sharer.clone(),
    );

    let report = booth.print_with_fallback(&grid4_session(), &original(), "", Orientation::Portrait);

    let FlowOutcome::Failed(decision) = report.print else {
        panic!("print should fail");
    };
    assert_eq!(decision.kind, ErrorKind::PrinterUnavailable);
    assert_eq!(decision.action, RecoveryAction::OfferRetry);
    assert_eq!(report.fallback_share, None);
    assert!(sharer.requests().is_empty());
}

#[test]
fn print_share_flow_tests_unreadable_share_is_terminal() {
    let booth = booth(
        photo_source(),
        RecordingPrinter::new(Ok(PrintOutcome::Completed)),
        RecordingSharer::new(Err(CollaboratorError::new("No such file or directory"))),
    );

    let FlowOutcome::Failed(decision) = booth.share(&original(), "Share") else {
        panic!("share should fail");
    };
    assert_eq!(decision.kind, ErrorKind::FileError);
    assert_eq!(decision.action, RecoveryAction::Terminal);
    assert!(decision.message.is_some());
}
