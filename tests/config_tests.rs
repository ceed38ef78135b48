use fb_slideshow::config::Configuration;
use fb_slideshow::options::{Background, Position, ScaleMode};
use fb_slideshow::platform::framebuffer::FramebufferId;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn empty_document_uses_defaults() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert!(cfg.inputs.is_empty());
    assert_eq!(cfg.framebuffer, None);
    assert_eq!(cfg.position, Position::TopLeft);
    assert_eq!(cfg.background, Background::Black);
    assert_eq!(cfg.scale, ScaleMode::Disabled);
    assert_eq!(cfg.delay, Duration::ZERO);
    assert_eq!(cfg.batch_size, 5);
    assert!(!cfg.repaint && !cfg.looping && !cfg.hide_cursor);
}

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
inputs: ["/photos/a.png", "/photos/more"]
framebuffer: 1
position: centered
background: disabled
scale: fit
delay: 3s
repaint: true
loop: true
hide-cursor: true
clear-on-exit: false
recursive: true
shuffle: true
shuffle-seed: 42
batch-size: 8
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        cfg.inputs,
        vec![PathBuf::from("/photos/a.png"), PathBuf::from("/photos/more")]
    );
    assert_eq!(cfg.framebuffer, Some(FramebufferId::Index(1)));
    assert_eq!(cfg.position, Position::Centered);
    assert_eq!(cfg.background, Background::Disabled);
    assert_eq!(cfg.scale, ScaleMode::Fit);
    assert_eq!(cfg.delay, Duration::from_secs(3));
    assert!(cfg.repaint && cfg.looping && cfg.hide_cursor);
    assert_eq!(cfg.clear_on_exit, Some(false));
    assert!(cfg.recursive && cfg.shuffle);
    assert_eq!(cfg.shuffle_seed, Some(42));
    assert_eq!(cfg.batch_size, 8);
}

#[test]
fn framebuffer_accepts_device_path() {
    let cfg: Configuration = serde_yaml::from_str("framebuffer: /dev/fb2").unwrap();
    assert_eq!(
        cfg.framebuffer,
        Some(FramebufferId::Path(PathBuf::from("/dev/fb2")))
    );
}

#[test]
fn unknown_key_is_rejected() {
    let err = serde_yaml::from_str::<Configuration>("colour: red").unwrap_err();
    assert!(err.to_string().contains("colour"), "{err}");
}

#[test]
fn unknown_position_lists_valid_names() {
    let err = serde_yaml::from_str::<Configuration>("position: middle").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("middle"), "{msg}");
    assert!(msg.contains("bottom-right"), "{msg}");
}

#[test]
fn numeric_alias_is_accepted_when_quoted() {
    let cfg: Configuration = serde_yaml::from_str("position: \"0\"\nbackground: \"3\"").unwrap();
    assert_eq!(cfg.position, Position::Centered);
    assert_eq!(cfg.background, Background::Green);
}

#[test]
fn validation_rejects_bad_values() {
    let base = || Configuration {
        inputs: vec![PathBuf::from("a.png")],
        ..Configuration::default()
    };

    assert!(base().validated().is_ok());

    let no_inputs = Configuration::default();
    assert!(no_inputs.validated().is_err());

    let zero_batch = Configuration {
        batch_size: 0,
        ..base()
    };
    assert!(zero_batch.validated().is_err());

    let fractional = Configuration {
        delay: Duration::from_millis(1500),
        ..base()
    };
    let err = fractional.validated().unwrap_err();
    assert!(err.to_string().contains("whole number"), "{err}");
}

#[test]
fn clear_on_exit_follows_repaint_and_cursor() {
    let mut cfg = Configuration::default();
    assert!(!cfg.clears_on_exit());
    cfg.repaint = true;
    assert!(cfg.clears_on_exit());
    cfg.repaint = false;
    cfg.hide_cursor = true;
    assert!(cfg.clears_on_exit());
    assert!(cfg.holds_last_frame());
    cfg.clear_on_exit = Some(false);
    assert!(!cfg.clears_on_exit());
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "inputs: [\"/tmp/x.png\"]\nscale: stretch\ndelay: 2s").unwrap();
    let cfg = Configuration::from_yaml_file(file.path())
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.scale, ScaleMode::Stretch);
    assert_eq!(cfg.slideshow_options().delay, Duration::from_secs(2));
}

#[test]
fn missing_file_reports_path() {
    let err = Configuration::from_yaml_file("/nonexistent/slideshow.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("/nonexistent/slideshow.yaml"));
}
