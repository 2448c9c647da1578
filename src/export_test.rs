#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn sticker_is_png() {
    assert_eq!(ExportKind::Sticker.extension(), "png");
    assert_eq!(ExportKind::Sticker.mime_type(), "image/png");
    assert_eq!(ExportKind::Jpeg.extension(), "jpeg");
    assert_eq!(ExportKind::Svg.mime_type(), "image/svg+xml");
}

#[test]
fn parse_kinds() {
    assert_eq!("png".parse::<ExportKind>().unwrap(), ExportKind::Png);
    assert_eq!("JPG".parse::<ExportKind>().unwrap(), ExportKind::Jpeg);
    assert_eq!(" sticker ".parse::<ExportKind>().unwrap(), ExportKind::Sticker);
    let err = "gif".parse::<ExportKind>().unwrap_err();
    assert_eq!(err, ExportError::UnknownKind("gif".into()));
}

#[test]
fn jpeg_gets_white_background_and_quality() {
    let opts = ExportOptions::for_kind(ExportKind::Jpeg, None);
    assert_eq!(opts.background.as_deref(), Some("#fff"));
    assert_eq!(opts.quality, Some(0.95));
}

#[test]
fn other_kinds_keep_transparency() {
    for kind in [ExportKind::Png, ExportKind::Svg, ExportKind::Sticker] {
        let opts = ExportOptions::for_kind(kind, None);
        assert_eq!(opts.background, None, "{kind}");
        assert_eq!(opts.quality, None);
    }
}

#[test]
fn studio_export_is_pinned_to_canvas() {
    let opts = ExportOptions::for_kind(ExportKind::Png, Some(Size::new(800.0, 450.0)));
    assert_eq!(opts.size, Some(Size::new(800.0, 450.0)));
}

#[test]
fn request_file_name_uses_extension() {
    let req = ExportRequest::new(ExportKind::Sticker, ExportPurpose::Download, None, "meme-gen-ultimate");
    assert_eq!(req.file_name, "meme-gen-ultimate.png");
    let req = ExportRequest::new(ExportKind::Jpeg, ExportPurpose::Template, None, "mine");
    assert_eq!(req.file_name, "mine.jpeg");
}

struct FailingAdapter;

impl ExportAdapter for FailingAdapter {
    fn export(&mut self, _request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::Render("canvas tainted".into()))
    }
}

#[test]
fn adapter_errors_display() {
    let req = ExportRequest::new(ExportKind::Png, ExportPurpose::Download, None, "x");
    let err = FailingAdapter.export(&req).unwrap_err();
    assert_eq!(err.to_string(), "rendering failed: canvas tainted");
}

#[test]
fn request_serializes_lowercase() {
    let req = ExportRequest::new(ExportKind::Svg, ExportPurpose::Template, None, "x");
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["kind"], "svg");
    assert_eq!(json["purpose"], "template");
}
