//! Tests for export naming.

use crate::model::{DocumentState, ImageRecord, Section};
use crate::naming::{NameContext, NameResolver};

/// Document with section "2.1" holding the given images.
fn doc_with_section(images: &[&str]) -> DocumentState {
    let mut section = Section::new("2.1");
    for name in images {
        section.images.push(ImageRecord::new(*name));
    }
    DocumentState::new()
        .with_naming("FIG", "DOC")
        .with_section(section)
        .unwrap()
}

#[test]
fn test_export_solo_image_has_no_index() {
    let doc = doc_with_section(&["a.jpg"]);
    let image = doc.find_image("a.jpg").unwrap().clone();
    let mut resolver = NameResolver::new();

    assert_eq!(
        resolver.export_name(&doc, &image, "2.1", 1),
        "FIG-DOC-2.1.jpg"
    );
}

#[test]
fn test_export_ai_title_truncated() {
    let mut doc = doc_with_section(&["a.jpg"]);
    let long = format!("{} tail", "x".repeat(55));
    doc.apply_ai_metadata("a.jpg", long, Vec::new()).unwrap();
    let image = doc.find_image("a.jpg").unwrap().clone();
    let mut resolver = NameResolver::new();

    assert_eq!(
        resolver.export_name(&doc, &image, "2.1", 1),
        format!("FIG-DOC-2.1-1 {}.jpg", "x".repeat(50))
    );
}

#[test]
fn test_export_blank_ai_title_uses_standard_name() {
    let mut doc = doc_with_section(&["a.jpg"]);
    doc.apply_ai_metadata("a.jpg", "   ", Vec::new()).unwrap();
    let image = doc.find_image("a.jpg").unwrap().clone();
    let mut resolver = NameResolver::new();

    assert_eq!(
        resolver.export_name(&doc, &image, "2.1", 1),
        "FIG-DOC-2.1.jpg"
    );
    assert_eq!(resolver.display_name(&doc, &image), "");
}

#[test]
fn test_export_multiple_images_keep_index() {
    let doc = doc_with_section(&["a.jpg", "b.png"]);
    let mut resolver = NameResolver::new();

    let first = doc.find_image("a.jpg").unwrap().clone();
    let second = doc.find_image("b.png").unwrap().clone();
    assert_eq!(
        resolver.export_name(&doc, &first, "2.1", 1),
        "FIG-DOC-2.1-1.jpg"
    );
    assert_eq!(
        resolver.export_name(&doc, &second, "2.1", 2),
        "FIG-DOC-2.1-2.png"
    );
}

#[test]
fn test_export_ai_named() {
    let mut doc = doc_with_section(&["a.jpg"]);
    doc.apply_ai_metadata("a.jpg", "Wiring: Main/Bus", Vec::new())
        .unwrap();
    let image = doc.find_image("a.jpg").unwrap().clone();
    let mut resolver = NameResolver::new();

    // AI names always carry the index, even for a lone image
    assert_eq!(
        resolver.export_name(&doc, &image, "2.1", 1),
        "FIG-DOC-2.1-1 Wiring_ Main_Bus.jpg"
    );
}

#[test]
fn test_export_fallback_for_missing_image() {
    let doc = doc_with_section(&["a.jpg"]);
    let mut resolver = NameResolver::new();

    assert_eq!(
        resolver.resolve_name(&doc, None, NameContext::Export, None, None),
        "FALLBACK-X_n_1.jpg"
    );
    assert_eq!(
        resolver.resolve_name(&doc, None, NameContext::Export, Some("3"), Some(2)),
        "FALLBACK-3_n_2.jpg"
    );
}

#[test]
fn test_export_fallback_for_missing_position() {
    let doc = doc_with_section(&["a.jpg"]);
    let image = ImageRecord::new("a.jpg");
    let mut resolver = NameResolver::new();

    assert_eq!(
        resolver.resolve_name(&doc, Some(&image), NameContext::Export, Some("2.1"), None),
        "FALLBACK-2.1_n_1.jpg"
    );
    assert_eq!(
        resolver.resolve_name(&doc, Some(&image), NameContext::Export, None, Some(4)),
        "FALLBACK-X_n_4.jpg"
    );
}

#[test]
fn test_export_fallback_without_naming_context() {
    let doc = DocumentState::new()
        .with_section(Section::new("1").with_image(ImageRecord::new("a.jpg")))
        .unwrap();
    let image = ImageRecord::new("a.jpg");
    let mut resolver = NameResolver::new();

    assert_eq!(
        resolver.export_name(&doc, &image, "1", 1),
        "FALLBACK-1_n_1.jpg"
    );
}

#[test]
fn test_export_extension_inference() {
    let doc = DocumentState::new()
        .with_naming("FIG", "DOC")
        .with_section(
            Section::new("4")
                .with_image(ImageRecord::new("shot.WEBP"))
                .with_image(ImageRecord::new("scan.tiff")),
        )
        .unwrap();
    let mut resolver = NameResolver::new();

    let webp = ImageRecord::new("shot.WEBP");
    let tiff = ImageRecord::new("scan.tiff");
    assert_eq!(resolver.export_name(&doc, &webp, "4", 1), "FIG-DOC-4-1.webp");
    assert_eq!(resolver.export_name(&doc, &tiff, "4", 2), "FIG-DOC-4-2.jpg");
}

#[test]
fn test_export_section_alias_lookup() {
    let mut section = Section::default();
    section.nomenclature_number = Some("5.2".to_string());
    section.images.push(ImageRecord::new("only.png"));
    let doc = DocumentState::new()
        .with_naming("IMG", "Manual")
        .with_section(section)
        .unwrap();
    let mut resolver = NameResolver::new();

    let image = ImageRecord::new("only.png");
    assert_eq!(
        resolver.export_name(&doc, &image, "5.2", 1),
        "IMG-Manual-5.2.png"
    );
}

#[test]
fn test_export_unknown_section_keeps_index() {
    let doc = doc_with_section(&["a.jpg"]);
    let image = ImageRecord::new("stray.jpg");
    let mut resolver = NameResolver::new();

    // A lookup miss must not produce a colliding index-less name
    assert_eq!(
        resolver.export_name(&doc, &image, "9.9", 1),
        "FIG-DOC-9.9-1.jpg"
    );
}
