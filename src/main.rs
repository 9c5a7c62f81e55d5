use clap::Parser;
use photo_picker::{CaptureResult, ControlToken, PickerController, Slot, ValidationOutcome};
use std::path::PathBuf;
use std::sync::Arc;

mod camera;
mod config;
mod error;
mod filesystem;
mod image_processing;
mod permissions;

use camera::DesktopCaptureService;
use config::AppSettings;
use error::AppError;
use filesystem::{default_output_dir, FsAssetSource};
use image_processing::ImageDownscaler;
use permissions::SettingsPermissions;

type DesktopPicker =
    PickerController<FsAssetSource, DesktopCaptureService, ImageDownscaler, SettingsPermissions>;

/// Browse a photo directory page by page and pick photos from it
#[derive(Parser, Debug)]
#[command(name = "camera-roll-picker", version, about)]
struct Cli {
    /// Directory serving as the media library
    library: PathBuf,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pages to load
    #[arg(short, long, default_value_t = 1)]
    pages: usize,

    /// Toggle the selection of the loaded items at these positions
    #[arg(short, long, num_args = 1..)]
    select: Vec<usize>,

    /// Import these files through the album control
    #[arg(short, long, num_args = 1..)]
    import: Vec<PathBuf>,

    /// Press the camera control
    #[arg(long)]
    camera: bool,

    /// Print the selection as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("camera-roll-picker"),
        );
    }

    #[cfg(not(target_os = "android"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn build_picker(cli: &Cli, settings: AppSettings) -> Result<DesktopPicker, AppError> {
    let output_dir = settings.output_dir.unwrap_or_else(default_output_dir);
    let mut picker = PickerController::new(
        settings.picker,
        FsAssetSource::new(&cli.library),
        DesktopCaptureService::new(cli.import.iter().cloned()),
        ImageDownscaler::new(output_dir),
        SettingsPermissions::from_settings(&settings.permissions),
    )?;

    picker.on_selection_changed(|selection, changed| {
        log::info!(
            "Selection changed ({} selected, toggled {})",
            selection.len(),
            changed.filename
        );
    });
    picker.on_capture_resized(|err, asset| match (err, asset) {
        (Some(e), _) => log::warn!("Resize failed: {}", e),
        (None, Some(asset)) => log::info!(
            "Resized to {}x{}: {}",
            asset.width,
            asset.height,
            asset.uri
        ),
        (None, None) => {}
    });

    Ok(picker)
}

async fn capture(picker: &mut DesktopPicker, token: ControlToken) {
    match picker.press_control(token).await {
        Ok(CaptureResult::Completed(ValidationOutcome::Accepted(asset))) => {
            println!("Captured {}", asset.filename);
            picker.toggle_selection(&Arc::new(asset));
        }
        Ok(CaptureResult::Completed(ValidationOutcome::Rejected(kind, asset))) => {
            println!(
                "Rejected {} ({}x{}): {:?}",
                asset.filename, asset.width, asset.height, kind
            );
        }
        Ok(CaptureResult::PermissionRequired(capability, status)) => {
            println!(
                "{:?} permission is {:?}. Grant it in the system settings to continue.",
                capability, status
            );
        }
        Ok(CaptureResult::Cancelled) => log::info!("{:?} capture cancelled", token),
        Err(e) => log::error!("{:?} capture failed: {}", token, e),
    }
}

fn print_grid(picker: &DesktopPicker) {
    if let Some(text) = picker.empty_text() {
        println!("{}", text);
        return;
    }

    for row in picker.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|slot| match slot {
                Slot::Control(ControlToken::Camera) => "[camera]".to_string(),
                Slot::Control(ControlToken::Album) => "[album]".to_string(),
                Slot::Asset(asset) if picker.is_selected(&asset.uri) => {
                    format!("{}*", asset.filename)
                }
                Slot::Asset(asset) => asset.filename.clone(),
                Slot::Empty => ".".to_string(),
            })
            .collect();
        println!("{}", cells.join("  "));
    }

    if picker.show_footer_spinner() {
        println!("(more available)");
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let settings = AppSettings::load(cli.config.as_deref())?;
    let mut picker = build_picker(&cli, settings)?;

    picker.mount().await?;
    for _ in 1..cli.pages {
        if !picker.on_end_reached().await? {
            break;
        }
    }
    log::info!(
        "Loaded {} items from {}",
        picker.items().len(),
        cli.library.display()
    );

    for &index in &cli.select {
        match picker.items().get(index).cloned() {
            Some(asset) => {
                if !picker.toggle_selection(&asset) {
                    log::warn!("Selection full, {} not added", asset.filename);
                }
            }
            None => log::warn!("No item at position {}", index),
        }
    }

    if cli.camera {
        capture(&mut picker, ControlToken::Camera).await;
    }
    for _ in &cli.import {
        capture(&mut picker, ControlToken::Album).await;
    }

    print_grid(&picker);

    if cli.json {
        let selection: Vec<_> = picker.selection().iter().map(|a| a.as_ref()).collect();
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        for asset in picker.selection() {
            println!("selected: {}", asset.uri);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_selection_and_imports() {
        let cli = Cli::try_parse_from([
            "camera-roll-picker",
            "/photos",
            "--pages",
            "3",
            "--select",
            "0",
            "2",
            "--import",
            "a.jpg",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.library, PathBuf::from("/photos"));
        assert_eq!(cli.pages, 3);
        assert_eq!(cli.select, vec![0, 2]);
        assert_eq!(cli.import, vec![PathBuf::from("a.jpg")]);
        assert!(cli.json);
        assert!(!cli.camera);
    }

    #[tokio::test]
    async fn test_picker_over_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            image::RgbImage::new(8, 8).save(dir.path().join(name)).unwrap();
        }
        let cli = Cli::try_parse_from(["camera-roll-picker", dir.path().to_str().unwrap()]).unwrap();

        let mut picker = build_picker(&cli, AppSettings::default()).unwrap();
        picker.mount().await.unwrap();

        assert_eq!(picker.items().len(), 3);
        assert!(picker.is_exhausted());
        // Two controls and three photos in rows of three
        assert_eq!(picker.rows().len(), 2);
        assert_eq!(picker.rows()[1][2], Slot::Empty);

        let first = picker.items()[0].clone();
        assert!(picker.toggle_selection(&first));
        assert!(picker.is_selected(&first.uri));
    }

    #[tokio::test]
    async fn test_paging_passes_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_broken.jpg"), b"garbage").unwrap();
        image::RgbImage::new(8, 8).save(dir.path().join("b_ok.png")).unwrap();
        let cli = Cli::try_parse_from(["camera-roll-picker", dir.path().to_str().unwrap()]).unwrap();
        let settings = AppSettings {
            picker: photo_picker::PickerConfig {
                page_size: 1,
                ..photo_picker::PickerConfig::default()
            },
            ..AppSettings::default()
        };

        let mut picker = build_picker(&cli, settings).unwrap();
        picker.mount().await.unwrap();

        assert_eq!(picker.items().len(), 1);
        assert_eq!(picker.items()[0].filename, "b_ok.png");
        assert!(picker.is_exhausted());
    }

    #[tokio::test]
    async fn test_camera_needs_permission_on_desktop() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["camera-roll-picker", dir.path().to_str().unwrap()]).unwrap();
        let mut picker = build_picker(&cli, AppSettings::default()).unwrap();
        picker.mount().await.unwrap();
        assert_eq!(picker.empty_text(), Some("No photos."));

        // Undetermined camera permission is requested and denied by default
        let result = picker.press_control(ControlToken::Camera).await.unwrap();
        assert!(matches!(result, CaptureResult::PermissionRequired(_, _)));
    }
}
