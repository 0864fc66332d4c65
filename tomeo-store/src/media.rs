use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "wmv", "avi"];
pub const THUMBNAIL_EXTENSION: &str = "png";

/// A video file and the same-named image that previews it.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct MediaPair {
    pub video: PathBuf,
    pub thumbnail: PathBuf,
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|video| ext.eq_ignore_ascii_case(video))
        })
}

/// Lists the videos in `dir` that have a thumbnail next to them, sorted by
/// file name. A missing directory has no media.
pub fn scan_media_dir(dir: &Path) -> io::Result<Vec<MediaPair>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Media directory does not exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut videos = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && is_video(&path) {
            videos.push(path);
        }
    }
    videos.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut pairs = Vec::with_capacity(videos.len());
    for video in videos {
        let thumbnail = video.with_extension(THUMBNAIL_EXTENSION);
        if thumbnail.is_file() {
            pairs.push(MediaPair { video, thumbnail });
        } else {
            warn!(video = %video.display(), "Thumbnail not found");
        }
    }

    debug!(dir = %dir.display(), found = pairs.len(), "Scanned media directory");
    Ok(pairs)
}
