//! End-to-end recovery over synthetic volumes

use std::path::Path;

use volrescue_core::carving::{JPEG, PNG};
use volrescue_core::fixture::{FixtureBuilder, FixtureConfig};
use volrescue_core::{recover_images, scan_volume, RecoveryConfig, RecoveryEngine, RecoveryError};

fn png_image(tag: &[u8]) -> Vec<u8> {
    let mut data = PNG.header.to_vec();
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]);
    data.extend_from_slice(b"IHDR");
    data.extend_from_slice(tag);
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    data.extend_from_slice(PNG.footer);
    data
}

fn jpeg_image(tag: &[u8]) -> Vec<u8> {
    let mut data = JPEG.header.to_vec();
    data.extend_from_slice(&[0xE0, 0x00, 0x10]);
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(tag);
    data.extend_from_slice(JPEG.footer);
    data
}

fn small_config(corrupt: bool) -> FixtureConfig {
    FixtureConfig {
        volume_size: 256 * 1024,
        corrupt_metadata: corrupt,
        ..Default::default()
    }
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_remnant_names_recovered_png() {
    let dir = tempfile::tempdir().unwrap();
    let png = png_image(b"photo");
    let fixture = FixtureBuilder::new(small_config(false))
        .add_remnant("PHOTO", "png")
        .add_file(png.clone())
        .build()
        .unwrap();

    let volume_path = dir.path().join("Image00.vol");
    std::fs::write(&volume_path, &fixture.bytes).unwrap();
    let out = dir.path().join("recovered");

    let count = recover_images(&volume_path, &out).unwrap();

    assert_eq!(count, 1);
    assert_eq!(output_names(&out), vec!["PHOTO.png"]);
    assert_eq!(std::fs::read(out.join("PHOTO.png")).unwrap(), png);
}

#[test]
fn test_zeroed_metadata_falls_back_to_offset_name() {
    let dir = tempfile::tempdir().unwrap();
    let png = png_image(b"photo");
    let fixture = FixtureBuilder::new(small_config(true))
        .add_remnant("PHOTO", "png")
        .add_file(png.clone())
        .build()
        .unwrap();
    let offset = fixture.file_offsets[0];

    let volume_path = dir.path().join("Image00.vol");
    std::fs::write(&volume_path, &fixture.bytes).unwrap();
    let out = dir.path().join("recovered");

    assert_eq!(recover_images(&volume_path, &out).unwrap(), 1);

    let expected = format!("recovered_{}.png", offset);
    assert_eq!(output_names(&out), vec![expected.clone()]);
    assert_eq!(std::fs::read(out.join(expected)).unwrap(), png);
}

#[test]
fn test_mixed_volume_recovers_every_image_in_offset_order() {
    let dir = tempfile::tempdir().unwrap();
    let images = vec![
        png_image(b"one"),
        png_image(b"two"),
        png_image(b"three"),
        jpeg_image(b"four"),
        jpeg_image(b"five"),
    ];
    let mut builder = FixtureBuilder::new(small_config(true));
    for image in &images {
        builder = builder.add_file(image.clone());
    }
    let fixture = builder.build().unwrap();

    let volume_path = dir.path().join("Image00.vol");
    std::fs::write(&volume_path, &fixture.bytes).unwrap();
    let engine = RecoveryEngine::new(
        &volume_path,
        dir.path().join("out"),
        RecoveryConfig::default(),
    )
    .unwrap();

    let report = engine.run();

    assert!(report.fatal_error.is_none());
    assert_eq!(report.recovered_count(), 5);
    assert_eq!(report.failed_count(), 0);
    for ((file, image), offset) in report.recovered.iter().zip(&images).zip(&fixture.file_offsets) {
        assert_eq!(file.start, *offset);
        assert_eq!(file.end, offset + image.len());
        assert_eq!(std::fs::read(&file.path).unwrap(), *image);
    }
    assert_eq!(report.recovered[3].format, "jpg");
    assert_eq!(report.total_bytes_recovered(), images.iter().map(|i| i.len() as u64).sum::<u64>());
}

#[test]
fn test_random_volume_recovers_nothing() {
    let dir = tempfile::tempdir().unwrap();

    // xorshift noise with every header byte pattern broken up
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let mut noise: Vec<u8> = (0..64 * 1024)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect();
    for byte in noise.iter_mut() {
        if *byte == 0xFF || *byte == 0x89 {
            *byte = 0x00;
        }
    }

    let volume_path = dir.path().join("noise.vol");
    std::fs::write(&volume_path, &noise).unwrap();
    let out = dir.path().join("out");

    assert_eq!(recover_images(&volume_path, &out).unwrap(), 0);
    assert!(output_names(&out).is_empty());
}

#[test]
fn test_missing_volume_is_an_initialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let err = recover_images(&dir.path().join("absent.vol"), &out).unwrap_err();

    assert!(matches!(err, RecoveryError::VolumeNotFound(_)));
    assert!(!out.exists());
}

#[test]
fn test_unreadable_volume_returns_zero() {
    let dir = tempfile::tempdir().unwrap();
    // A directory exists but cannot be read as a volume
    let volume_path = dir.path().join("volume_dir");
    std::fs::create_dir(&volume_path).unwrap();

    let engine = RecoveryEngine::new(
        &volume_path,
        dir.path().join("out"),
        RecoveryConfig::default(),
    )
    .unwrap();
    let report = engine.run();

    assert_eq!(report.recovered_count(), 0);
    assert!(report.fatal_error.is_some());
}

#[test]
fn test_scan_matches_recovery_names() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = FixtureBuilder::new(small_config(false))
        .add_remnant("CAT", "JPG")
        .add_remnant("PHOTO", "png")
        .add_file(png_image(b"p"))
        .add_file(jpeg_image(b"j"))
        .build()
        .unwrap();

    let volume_path = dir.path().join("Image00.vol");
    std::fs::write(&volume_path, &fixture.bytes).unwrap();

    let resolved = scan_volume(&volume_path, &RecoveryConfig::default()).unwrap();
    let names: Vec<&str> = resolved.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["PHOTO.png", "CAT.jpg"]);

    // A zero window turns name recovery off
    let blind = scan_volume(&volume_path, &RecoveryConfig::default().with_search_window(0)).unwrap();
    assert_eq!(blind[0].name, format!("recovered_{}.png", fixture.file_offsets[0]));
}

#[test]
fn test_keep_output_preserves_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = FixtureBuilder::new(small_config(true))
        .add_file(png_image(b"keep"))
        .build()
        .unwrap();
    let volume_path = dir.path().join("Image00.vol");
    std::fs::write(&volume_path, &fixture.bytes).unwrap();

    let out = dir.path().join("out");
    let name = format!("recovered_{}.png", fixture.file_offsets[0]);
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join(&name), b"older run").unwrap();

    let config = RecoveryConfig {
        clear_output: false,
        ..Default::default()
    };
    let engine = RecoveryEngine::new(&volume_path, &out, config).unwrap();
    assert_eq!(engine.recover_images(), 1);

    assert_eq!(std::fs::read(out.join(&name)).unwrap(), b"older run");
    let suffixed = format!("recovered_{}_1.png", fixture.file_offsets[0]);
    assert!(out.join(suffixed).exists());
}
