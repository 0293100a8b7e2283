//! Tests loading extra catalog entries from JSON documents.

use cutprint_catalog::{CatalogError, FrameKind, StyleCatalog};

#[test]
fn catalog_extension_tests_appends_after_builtins() {
    let mut catalog = StyleCatalog::builtin();
    let builtin_frames = catalog.frames().len();

    catalog
        .extend_from_json(
            r##"{
                "filters": [{
                    "id": "party_pink",
                    "name": "Party",
                    "category": "warm",
                    "transform": {"overlay": {"color": "#FF69B4", "opacity": 0.2}}
                }],
                "frames": [{
                    "id": "venue_logo",
                    "name": "Venue",
                    "category": "custom",
                    "style": {
                        "type": "image",
                        "border_width": 40,
                        "source_uri": "file:///srv/booth/venue.png",
                        "fallback_color": "#222"
                    }
                }]
            }"##,
        )
        .expect("document should load");

    assert_eq!(catalog.frames().len(), builtin_frames + 1);
    assert_eq!(catalog.frames().last().map(|f| f.id.as_str()), Some("venue_logo"));
    assert!(matches!(
        catalog.frame_by_id("venue_logo").map(|f| &f.style),
        Some(FrameKind::Image { border_width: 40, .. })
    ));
    assert!(catalog.filter_by_id("party_pink").is_some());
}

#[test]
fn catalog_extension_tests_rejects_gradient_without_stops() {
    let mut catalog = StyleCatalog::builtin();
    let error = catalog
        .extend_from_json(
            r##"{"frames": [{
                "id": "broken",
                "name": "Broken",
                "category": "gradient",
                "style": {"type": "gradient", "border_width": 10, "colors": ["#fff"], "direction": "vertical"}
            }]}"##,
        )
        .expect_err("single-stop gradient is invalid");
    assert!(matches!(error, CatalogError::IncompleteGradient(id) if id == "broken"));
    assert!(catalog.frame_by_id("broken").is_none());
}

#[test]
fn catalog_extension_tests_rejects_gradient_missing_colors_field() {
    let mut catalog = StyleCatalog::builtin();
    let error = catalog
        .extend_from_json(
            r#"{"frames": [{
                "id": "broken",
                "name": "Broken",
                "category": "gradient",
                "style": {"type": "gradient", "border_width": 10, "direction": "vertical"}
            }]}"#,
        )
        .expect_err("gradient without colors cannot decode");
    assert!(matches!(error, CatalogError::Decode(_)));
}

#[test]
fn catalog_extension_tests_rejects_duplicates_and_bad_opacity() {
    let mut catalog = StyleCatalog::builtin();
    let duplicate = catalog
        .extend_from_json(r#"{"filters": [{"id": "original", "name": "Again", "category": "basic"}]}"#)
        .expect_err("duplicate id");
    assert!(matches!(duplicate, CatalogError::DuplicateId(_)));

    let opacity = catalog
        .extend_from_json(
            r##"{"filters": [{"id": "x", "name": "X", "category": "basic",
                "transform": {"overlay": {"color": "#000", "opacity": 1.5}}}]}"##,
        )
        .expect_err("opacity above one");
    assert!(matches!(opacity, CatalogError::OutOfRange { field: "overlay.opacity", .. }));
}
