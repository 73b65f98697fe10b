use super::*;

#[test]
fn format_parsing_accepts_aliases_and_rejects_unknown() {
    assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
    assert_eq!("jpg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
    assert_eq!(" webp ".parse::<ExportFormat>().unwrap(), ExportFormat::Webp);
    assert!(matches!(
        "gif".parse::<ExportFormat>(),
        Err(BannerError::Encoding(_))
    ));
}

#[test]
fn formats_know_their_extension_and_mime_type() {
    let table = [
        (ExportFormat::Png, "png", "image/png"),
        (ExportFormat::Jpeg, "jpeg", "image/jpeg"),
        (ExportFormat::Webp, "webp", "image/webp"),
    ];
    for (format, ext, mime) in table {
        assert_eq!(format.extension(), ext);
        assert_eq!(format.mime_type(), mime);
        assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
    }
}

#[test]
fn default_spec_is_png_at_092() {
    let spec = ExportSpec::default();
    assert_eq!(spec.format, ExportFormat::Png);
    assert_eq!(spec.quality, 0.92);
    let parsed: ExportSpec = serde_json::from_str(r#"{"format":"jpeg"}"#).unwrap();
    assert_eq!(parsed.format, ExportFormat::Jpeg);
    assert_eq!(parsed.quality, 0.92);
}

fn sample(filename: &str) -> ExportedImage {
    ExportedImage {
        bytes: vec![1, 2, 3],
        format: ExportFormat::Png,
        width: 1,
        height: 1,
        filename: filename.to_string(),
    }
}

#[test]
fn write_to_dir_creates_directory_and_leaves_no_temporary() {
    let dir = std::env::temp_dir().join(format!("bannerkit-write-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let path = sample("out.png").write_to_dir(&dir.join("nested")).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    let names: Vec<_> = std::fs::read_dir(dir.join("nested"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("out.png")]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let dir = std::env::temp_dir().join(format!("bannerkit-fail-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("taken.png")).unwrap();

    // Renaming a file over a non-empty directory fails on every platform.
    std::fs::write(dir.join("taken.png").join("keep"), b"x").unwrap();
    let err = sample("taken.png").write_to_dir(&dir).unwrap_err();
    assert!(matches!(err, BannerError::Other(_)));
    assert!(!dir.join(".taken.png.partial").exists());

    let _ = std::fs::remove_dir_all(&dir);
}
