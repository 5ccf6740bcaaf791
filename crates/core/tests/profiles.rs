//! The label profiles shipped in `profiles/` load and validate.

use batch_label_core::{FieldKind, LabelConfig, PrintJob, load_profile_from_str, render_label};

#[test]
fn plain_profile_equals_default_preset() {
    let cfg = load_profile_from_str(include_str!("../../../profiles/plain-70x36.json")).unwrap();
    assert_eq!(cfg, LabelConfig::default());
}

#[test]
fn barcode_profile_renders() {
    let cfg = load_profile_from_str(include_str!("../../../profiles/barcode-70x36.json")).unwrap();
    assert!(matches!(cfg.fields[1].kind, FieldKind::Barcode(_)));
    let job = PrintJob::new("ToGD", "12345", 1).unwrap();
    let label = render_label(&cfg, &job).unwrap();
    assert!(label.markup.contains("^BC"));
}

#[test]
fn large_300dpi_profile_renders() {
    let cfg = load_profile_from_str(include_str!("../../../profiles/plain-100x50-300dpi.json"))
        .unwrap();
    assert_eq!(cfg.label.dpi, 300);
    let job = PrintJob::new("ToGD", "12345", 1).unwrap();
    let label = render_label(&cfg, &job).unwrap();
    assert_eq!(label.layout.width_dots, 1200);
    assert_eq!(label.layout.height_dots, 600);
}
