use photo_picker::metadata::mime_from_extension;
use photo_picker::{
    AssetOrigin, AssetRecord, AssetSource, AssetType, GroupType, Page, PageCursor, PageRequest,
    ServiceError,
};
use std::fs;
use std::path::{Path, PathBuf};

use crate::image_processing::image_dimensions;

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm"];

/// Directory for files the app produces (downscaled captures)
pub fn default_output_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        PathBuf::from("/data/data/de.teilgedanken.camerarollpicker/files/resized")
    }

    #[cfg(not(target_os = "android"))]
    {
        PathBuf::from("./data/resized")
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn is_video(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

fn matches_asset_type(path: &Path, asset_type: AssetType) -> bool {
    let Some(ext) = extension_of(path) else {
        return false;
    };
    let photo = PHOTO_EXTENSIONS.contains(&ext.as_str());
    let video = VIDEO_EXTENSIONS.contains(&ext.as_str());
    match asset_type {
        AssetType::Photos => photo,
        AssetType::Videos => video,
        AssetType::All => photo || video,
    }
}

/// Sorted names of the media files directly inside `dir`
pub fn list_media_files(dir: &Path, asset_type: AssetType) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter(|entry| matches_asset_type(&entry.path(), asset_type))
        .filter_map(|entry| entry.file_name().to_str().map(|s| s.to_string()))
        .collect();
    names.sort();
    Ok(names)
}

/// Media library backed by a single directory.
///
/// Files are listed in name order; the cursor is the name of the last file
/// handed out, so files added behind it still show up on later pages.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn scan_page(root: &Path, request: &PageRequest) -> Result<Page, ServiceError> {
    if request.filters.group_type != GroupType::SavedPhotos {
        log::debug!(
            "Group type {:?} not supported by directory source, ignoring",
            request.filters.group_type
        );
    }

    let names = list_media_files(root, request.filters.asset_type)?;
    let start = request
        .cursor
        .as_ref()
        .map_or(0, |cursor| names.partition_point(|n| n.as_str() <= cursor.as_str()));

    // Unreadable files are skipped without counting towards the page, so a
    // page only comes back short when the names run out.
    let mut items = Vec::with_capacity(request.page_size.min(names.len() - start));
    let mut consumed = start;
    while consumed < names.len() && items.len() < request.page_size {
        let name = &names[consumed];
        consumed += 1;

        let path = root.join(name);
        let (width, height) = if is_video(&path) {
            (0, 0)
        } else {
            match image_dimensions(&path) {
                Ok(dims) => dims,
                Err(e) => {
                    log::warn!("Skipping unreadable image {}: {}", path.display(), e);
                    continue;
                }
            }
        };

        items.push(AssetRecord {
            uri: path.to_string_lossy().to_string(),
            width,
            height,
            mime_type: mime_from_extension(name).to_string(),
            filename: name.clone(),
            source: AssetOrigin::Library,
            is_stored: true,
        });
    }

    log::debug!(
        "Scanned {}: {} items from {} of {} files starting at {}",
        root.display(),
        items.len(),
        consumed - start,
        names.len(),
        start
    );

    Ok(Page {
        items,
        next_cursor: names[start..consumed].last().map(|name| PageCursor(name.clone())),
        has_more: Some(consumed < names.len()),
    })
}

impl AssetSource for FsAssetSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, ServiceError> {
        let root = self.root.clone();
        let request = request.clone();

        // Directory listing and header decoding block
        tokio::task::spawn_blocking(move || scan_page(&root, &request))
            .await
            .map_err(|e| ServiceError::Other(format!("Task join error: {}", e)))?
    }
}
