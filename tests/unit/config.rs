use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "scrubframe_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba(rgba));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

#[test]
fn storefront_defaults() {
    let cfg = EngineConfig::storefront("frames");
    cfg.validate().unwrap();
    let FramesConfig::Raster { count, naming, .. } = &cfg.frames else {
        panic!("expected raster frames");
    };
    assert_eq!(*count, Some(240));
    assert_eq!(naming.ffmpeg_pattern(), "frame_%04d.jpg");
    assert_eq!(cfg.smoothing, Some(SmoothingConfig { lag_secs: 0.5 }));

    let curve = cfg.curve.curve(240).unwrap();
    assert!(curve.reversed);
    assert_eq!(curve.active_fraction, 0.7);
    assert_eq!(curve.map(0.0).0, 239);
}

#[test]
fn paper_defaults() {
    let cfg = EngineConfig::paper(640, 480, None);
    cfg.validate().unwrap();
    assert!(matches!(
        cfg.frames,
        FramesConfig::Paper {
            frame_count: 60,
            ..
        }
    ));
    let curve = cfg.curve.curve(60).unwrap();
    assert!(!curve.reversed);
    assert_eq!(curve.map(1.0).0, 59);
}

#[test]
fn minimal_json_uses_defaults() {
    let cfg =
        EngineConfig::from_json_str(r#"{ "frames": { "kind": "raster", "dir": "frames" } }"#)
            .unwrap();
    assert_eq!(cfg.curve, CurveConfig::default());
    assert_eq!(cfg.smoothing, None);
    assert_eq!(cfg.load, LoadConfig::default());
    assert_eq!(cfg.clear_rgba, [0, 0, 0, 255]);
    assert!(matches!(
        cfg.frames,
        FramesConfig::Raster { count: None, .. }
    ));
}

#[test]
fn full_json_round_trips_through_serde() {
    let json = r#"{
        "frames": { "kind": "paper", "width": 320, "height": 200, "frame_count": 30, "seed": 4 },
        "curve": { "active_fraction": 0.5, "reversed": false, "ease": "OutCubic" },
        "smoothing": { "lag_secs": 0.25 },
        "load": { "threads": 2 },
        "clear_rgba": [1, 2, 3, 255]
    }"#;
    let cfg = EngineConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.curve.ease, Ease::OutCubic);
    assert_eq!(cfg.load.threads, Some(2));
    assert_eq!(cfg.load_options().threads, Some(2));
    assert_eq!(cfg.smoothing().unwrap().unwrap().lag_secs(), 0.25);

    let again = EngineConfig::from_json_str(&serde_json::to_string(&cfg).unwrap()).unwrap();
    assert_eq!(again, cfg);
}

#[test]
fn unknown_fields_and_bad_json_are_serde_errors() {
    for json in [
        r#"{ "frames": { "kind": "raster", "dir": "f" }, "speed": 2 }"#,
        r#"{ "frames": { "kind": "raster", "dir": "f", "fps": 30 } }"#,
        r#"{ "frames": { "kind": "video", "dir": "f" } }"#,
        r#"{ "frames": "#,
    ] {
        assert!(
            matches!(EngineConfig::from_json_str(json), Err(ScrubError::Serde(_))),
            "{json}"
        );
    }
}

#[test]
fn validate_rejects_bad_values() {
    let mut cfg = EngineConfig::storefront("frames");
    cfg.curve.active_fraction = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::storefront("frames");
    cfg.smoothing = Some(SmoothingConfig { lag_secs: -1.0 });
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::storefront("frames");
    cfg.load.threads = Some(0);
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::storefront("frames");
    cfg.frames = FramesConfig::Raster {
        dir: "frames".into(),
        count: Some(0),
        naming: FrameNaming::default(),
    };
    assert!(cfg.validate().is_err());

    assert!(EngineConfig::paper(0, 480, None).validate().is_err());
    assert!(EngineConfig::paper(100_000, 480, None).validate().is_err());
}

#[test]
fn build_store_for_paper_is_ready() {
    let cfg = EngineConfig::paper(32, 24, Some(1));
    let store = cfg
        .build_store(Path::new("."), &cfg.load_options(), &|_| {})
        .unwrap();
    assert!(store.is_ready());
    assert!(store.is_procedural());
    assert_eq!(store.frame_count(), 60);
    assert_eq!(store.frame_canvas(), Some(Canvas::new(32, 24).unwrap()));
}

#[test]
fn build_store_resolves_relative_raster_dir() {
    let base = temp_dir("config_build_store");
    let frames = base.join("frames");
    std::fs::create_dir_all(&frames).unwrap();
    for i in 0..4u8 {
        write_png(&frames.join(format!("f{:02}.png", i + 1)), [i, 0, 0, 255]);
    }

    let json = r#"{
        "frames": {
            "kind": "raster",
            "dir": "frames",
            "naming": { "prefix": "f", "digits": 2, "ext": "png" }
        }
    }"#;
    let cfg = EngineConfig::from_json_str(json).unwrap();
    let store = cfg
        .build_store(&base, &cfg.load_options(), &|_| {})
        .unwrap();
    assert!(store.is_ready());
    assert_eq!(store.frame_count(), 4);
    assert_eq!(store.frame_canvas(), Some(Canvas::new(3, 2).unwrap()));

    std::fs::remove_dir_all(&base).ok();
}

#[test]
fn missing_config_file_names_the_path() {
    let err = EngineConfig::from_json_file(Path::new("/definitely/missing/scrub.json")).unwrap_err();
    assert!(err.to_string().contains("scrub.json"));
}
