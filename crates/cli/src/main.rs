use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use gesture_reaction_core::detection::domain::landmark_detector::LandmarkDetector;
use gesture_reaction_core::detection::infrastructure::subprocess_landmark_detector::SubprocessLandmarkDetector;
use gesture_reaction_core::gesture::domain::gesture::GestureVerdict;
use gesture_reaction_core::pipeline::detect_gesture_use_case::{DetectGestureUseCase, GestureReport};
use gesture_reaction_core::reaction::infrastructure::reaction_library::catalog;
use gesture_reaction_core::shared::config::SessionConfig;
use gesture_reaction_core::shared::constants::IMAGE_EXTENSIONS;
use gesture_reaction_core::shared::error::SessionError;
use gesture_reaction_core::video::infrastructure::image_file_reader::ImageFileReader;

/// Hand gesture recognition with reaction images.
#[derive(Parser)]
#[command(name = "gesture-reaction")]
struct Cli {
    /// JSON settings file (defaults to the per-user settings, then built-ins).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding reaction_thumb.jpg, reaction_point.jpg, reaction_head.jpg.
    #[arg(long, global = true)]
    assets_dir: Option<PathBuf>,

    /// Landmark program to spawn (hand + face mesh estimator).
    #[arg(long, global = true)]
    landmark_program: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the gesture in one image and print the result as JSON.
    Detect {
        /// Input image file.
        image: PathBuf,
    },
    /// Print the reaction asset table as JSON.
    Reactions,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };
    process::exit(code);
}

/// Returns whether the command succeeded. Detection failures, including a
/// bad config, are reported on stdout as JSON, not as `Err`.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    match &cli.command {
        Command::Detect { image } => {
            let report = detect_report(&cli, image);
            println!("{}", report.to_json()?);
            Ok(report.is_success())
        }
        Command::Reactions => {
            let config = load_config(&cli)?;
            let entries = catalog(&config.assets_dir);
            println!("{}", serde_json::to_string_pretty(&entries)?);
            Ok(true)
        }
    }
}

fn detect_report(cli: &Cli, image: &Path) -> GestureReport {
    match load_config(cli) {
        Ok(config) => GestureReport::from(detect(image, &config)),
        Err(e) => GestureReport::failed(e),
    }
}

fn load_config(cli: &Cli) -> Result<SessionConfig, Box<dyn std::error::Error>> {
    let mut config = SessionConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = &cli.assets_dir {
        config.assets_dir = dir.clone();
    }
    if let Some(program) = &cli.landmark_program {
        config.landmark_program = program.clone();
    }
    Ok(config)
}

fn detect(image: &Path, config: &SessionConfig) -> Result<GestureVerdict, SessionError> {
    if !image.is_file() {
        return Err(SessionError::unreadable(
            image.display().to_string(),
            "file not found",
        ));
    }
    if !is_image(image) {
        log::warn!(
            "{} has no image extension; decoding anyway",
            image.display()
        );
    }

    let detector: Box<dyn LandmarkDetector> = Box::new(SubprocessLandmarkDetector::spawn(
        &config.landmark_program,
        &config.landmark_args,
    )?);
    let mut use_case = DetectGestureUseCase::new(
        Box::new(ImageFileReader::new()),
        detector,
        config.gesture,
    );
    use_case.execute(image)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.jpg", true)]
    #[case("photo.JPEG", true)]
    #[case("scan.png", true)]
    #[case("clip.mp4", false)]
    #[case("README", false)]
    fn test_is_image(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_image(Path::new(name)), expected);
    }

    #[test]
    fn test_detect_missing_file_fails_before_spawning() {
        let config = SessionConfig {
            landmark_program: PathBuf::from("/nonexistent/landmark-program"),
            ..SessionConfig::default()
        };
        let err = detect(Path::new("/nonexistent/photo.jpg"), &config).unwrap_err();
        assert!(matches!(err, SessionError::SourceUnreadable { .. }));
    }

    #[test]
    fn test_detect_without_landmark_program_is_dependency_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("photo.png");
        image::RgbImage::new(4, 4).save(&image).unwrap();
        let config = SessionConfig {
            landmark_program: PathBuf::from("/nonexistent/landmark-program"),
            ..SessionConfig::default()
        };

        let report = GestureReport::from(detect(&image, &config));
        assert!(!report.is_success());
        assert!(report.to_json().unwrap().contains("landmark source unavailable"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"assets_dir": "from-file", "mirror": false}"#).unwrap();

        let cli = Cli::parse_from([
            "gesture-reaction",
            "--config",
            path.to_str().unwrap(),
            "--landmark-program",
            "/opt/landmarks",
            "reactions",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("from-file"));
        assert_eq!(config.landmark_program, PathBuf::from("/opt/landmarks"));
        assert!(!config.mirror);
    }

    #[test]
    fn test_detect_with_malformed_config_reports_json_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        std::fs::write(&config, "{not json").unwrap();
        let image = dir.path().join("photo.png");

        let cli = Cli::parse_from([
            "gesture-reaction",
            "--config",
            config.to_str().unwrap(),
            "detect",
            image.to_str().unwrap(),
        ]);
        let report = detect_report(&cli, &image);

        assert!(!report.is_success());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("invalid config"));
    }

    #[test]
    fn test_detect_requires_image_argument() {
        let err = Cli::try_parse_from(["gesture-reaction", "detect"]).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
