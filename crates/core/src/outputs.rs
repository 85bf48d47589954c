//! Output listing entries and selection of the artifacts to show.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::endpoints::GET_FILE;

/// File names that look like a still image (or the pipeline's `out.*`).
const IMAGE_NAME_PATTERN: &str = r"\.jpg|\.png|out";

/// Extension of the assembled short.
const VIDEO_EXTENSION: &str = ".mp4";

static IMAGE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMAGE_NAME_PATTERN).expect("valid regex"));

/// One output folder as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtime: Option<i64>,
}

/// Files picked from one output folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSelection {
    pub image: Option<String>,
    pub video: Option<String>,
}

/// Pick the image and video to show from a folder's file list.
///
/// The image is the first name matching [`IMAGE_NAME_PATTERN`], or the
/// first file overall when nothing matches. The video is the first
/// `.mp4`, if any.
pub fn select_artifacts(files: &[String]) -> ArtifactSelection {
    let image = files
        .iter()
        .find(|f| IMAGE_NAME_RE.is_match(f))
        .or_else(|| files.first())
        .cloned();
    let video = files.iter().find(|f| f.ends_with(VIDEO_EXTENSION)).cloned();
    ArtifactSelection { image, video }
}

/// URL that serves `<folder>/<file>` through the get-file endpoint.
pub fn file_url(base_url: &str, folder: &str, file: &str) -> String {
    let path = format!("{folder}/{file}");
    format!(
        "{}{}?path={}",
        base_url.trim_end_matches('/'),
        GET_FILE,
        urlencoding::encode(&path)
    )
}

/// What the result area shows after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    /// The listing was empty.
    NoResults,
    /// The most recent folder and links to its artifacts.
    Latest {
        folder: String,
        image_url: Option<String>,
        video_url: Option<String>,
    },
}

/// Build the result view from a listing (newest first).
pub fn result_view(base_url: &str, items: &[OutputItem]) -> ResultView {
    let Some(latest) = items.first() else {
        return ResultView::NoResults;
    };

    let picked = select_artifacts(&latest.files);
    ResultView::Latest {
        folder: latest.path.clone(),
        image_url: picked
            .image
            .map(|f| file_url(base_url, &latest.path, &f)),
        video_url: picked
            .video
            .map(|f| file_url(base_url, &latest.path, &f)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn item(path: &str, names: &[&str]) -> OutputItem {
        OutputItem {
            id: None,
            path: path.to_string(),
            files: files(names),
            mtime: None,
        }
    }

    #[test]
    fn picks_png_and_mp4() {
        let picked = select_artifacts(&files(&["out.png", "clip.mp4"]));
        assert_eq!(picked.image.as_deref(), Some("out.png"));
        assert_eq!(picked.video.as_deref(), Some("clip.mp4"));
    }

    #[test]
    fn image_pattern_skips_audio() {
        let picked = select_artifacts(&files(&["speech.wav", "bg.jpg", "short.mp4"]));
        assert_eq!(picked.image.as_deref(), Some("bg.jpg"));
        assert_eq!(picked.video.as_deref(), Some("short.mp4"));
    }

    #[test]
    fn image_falls_back_to_first_file() {
        let picked = select_artifacts(&files(&["speech.wav", "notes.txt"]));
        assert_eq!(picked.image.as_deref(), Some("speech.wav"));
        assert_eq!(picked.video, None);
    }

    #[test]
    fn empty_folder_selects_nothing() {
        assert_eq!(select_artifacts(&[]), ArtifactSelection::default());
    }

    #[test]
    fn file_url_escapes_the_whole_path() {
        let url = file_url("http://host:5000/", "outputs/functions/17 00", "out.png");
        assert_eq!(
            url,
            "http://host:5000/functions/v1/get-file?path=outputs%2Ffunctions%2F17%2000%2Fout.png"
        );
    }

    #[test]
    fn empty_listing_is_no_results() {
        assert_eq!(result_view("http://h", &[]), ResultView::NoResults);
    }

    #[test]
    fn latest_entry_is_the_first_one() {
        let items = [
            item("outputs/functions/2", &["out.png", "clip.mp4"]),
            item("outputs/functions/1", &["old.jpg"]),
        ];
        let view = result_view("http://h", &items);
        assert_eq!(
            view,
            ResultView::Latest {
                folder: "outputs/functions/2".to_string(),
                image_url: Some(
                    "http://h/functions/v1/get-file?path=outputs%2Ffunctions%2F2%2Fout.png"
                        .to_string()
                ),
                video_url: Some(
                    "http://h/functions/v1/get-file?path=outputs%2Ffunctions%2F2%2Fclip.mp4"
                        .to_string()
                ),
            }
        );
    }

    #[test]
    fn listing_entry_tolerates_missing_files() {
        let parsed: OutputItem =
            serde_json::from_value(serde_json::json!({"path": "outputs/functions/9", "mtime": 5}))
                .unwrap();
        assert!(parsed.files.is_empty());
        assert_eq!(parsed.mtime, Some(5));
    }
}
