use std::fmt;
use std::path::Path;

/// Media kind of a library section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Movie,
    Show,
    Artist,
    /// Any other section type (photos, or a database type code we do not
    /// know). Carries the raw value for diagnostics.
    Unsupported(String),
}

impl SectionKind {
    /// Parse the `type` attribute of a section in the HTTP API.
    pub fn from_api(value: &str) -> Self {
        match value {
            "movie" => SectionKind::Movie,
            "show" => SectionKind::Show,
            "artist" => SectionKind::Artist,
            other => SectionKind::Unsupported(other.to_string()),
        }
    }

    /// Map `library_sections.section_type` from the database.
    pub fn from_db_code(code: i64) -> Self {
        match code {
            1 => SectionKind::Movie,
            2 => SectionKind::Show,
            8 => SectionKind::Artist,
            other => SectionKind::Unsupported(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, SectionKind::Unsupported(_))
    }

    /// Metadata type code used to list leaf items of this kind over HTTP:
    /// movies, episodes, tracks.
    pub fn item_type_code(&self) -> Option<u32> {
        match self {
            SectionKind::Movie => Some(1),
            SectionKind::Show => Some(4),
            SectionKind::Artist => Some(10),
            SectionKind::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Movie => f.write_str("movie"),
            SectionKind::Show => f.write_str("show"),
            SectionKind::Artist => f.write_str("artist"),
            SectionKind::Unsupported(raw) => write!(f, "unsupported ({})", raw),
        }
    }
}

// https://en.wikipedia.org/wiki/Video_file_format
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".webm", ".mkv", ".flv", ".vob", ".ogv", ".ogg", ".drc", ".gif", ".gifv", ".mng", ".avi",
    ".mts", ".m2ts", ".ts", ".mov", ".qt", ".wmv", ".yuv", ".rm", ".rmvb", ".viv", ".asf",
    ".amv", ".mp4", ".m4p", ".m4v", ".mpg", ".mp2", ".mpeg", ".mpe", ".mpv", ".m2v", ".svi",
    ".3gp", ".3g2", ".mxf", ".roq", ".nsv", ".f4v", ".f4p", ".f4a", ".f4b",
];

// https://en.wikipedia.org/wiki/Audio_file_format
pub const AUDIO_EXTENSIONS: &[&str] = &[
    ".3gp", ".aa", ".aac", ".aax", ".act", ".aiff", ".alac", ".amr", ".ape", ".au", ".awb",
    ".dss", ".dvf", ".flac", ".gsm", ".iklax", ".ivs", ".m4a", ".m4b", ".m4p", ".mmf", ".mp3",
    ".mpc", ".msv", ".nmf", ".ogg", ".oga", ".mogg", ".opus", ".ra", ".rm", ".raw", ".rf64",
    ".sln", ".tta", ".voc", ".vox", ".wav", ".wma", ".wv", ".webm", ".8svx", ".cda",
];

/// Extensions (lowercase, leading dot) counted as media for a section kind.
pub fn whitelist(kind: &SectionKind) -> &'static [&'static str] {
    match kind {
        SectionKind::Artist => AUDIO_EXTENSIONS,
        _ => VIDEO_EXTENSIONS,
    }
}

pub fn is_media_file(path: &Path, whitelist: &[&str]) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_lowercase());
            whitelist.contains(&dotted.as_str())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_artist_gets_audio_everything_else_video() {
        assert_eq!(whitelist(&SectionKind::Artist), AUDIO_EXTENSIONS);
        assert_eq!(whitelist(&SectionKind::Movie), VIDEO_EXTENSIONS);
        assert_eq!(whitelist(&SectionKind::Show), VIDEO_EXTENSIONS);
    }

    #[test]
    fn test_whitelists_are_distinct_and_non_empty() {
        let audio: HashSet<_> = AUDIO_EXTENSIONS.iter().collect();
        let video: HashSet<_> = VIDEO_EXTENSIONS.iter().collect();
        assert!(!audio.is_empty());
        assert!(!video.is_empty());
        assert_ne!(audio, video);
        assert!(audio.contains(&".flac") && !video.contains(&".flac"));
        assert!(video.contains(&".mkv") && !audio.contains(&".mkv"));
    }

    #[test]
    fn test_catalog_entries_are_lowercase_and_dotted() {
        for ext in AUDIO_EXTENSIONS.iter().chain(VIDEO_EXTENSIONS) {
            assert!(ext.starts_with('.'), "{}", ext);
            assert_eq!(*ext, ext.to_lowercase());
        }
    }

    #[test]
    fn test_is_media_file_ignores_case() {
        let video = whitelist(&SectionKind::Movie);
        assert!(is_media_file(Path::new("/m/Film.MKV"), video));
        assert!(is_media_file(Path::new("/m/film.mp4"), video));
        assert!(!is_media_file(Path::new("/m/film.nfo"), video));
        assert!(!is_media_file(Path::new("/m/README"), video));
    }

    #[test]
    fn test_db_codes() {
        assert_eq!(SectionKind::from_db_code(1), SectionKind::Movie);
        assert_eq!(SectionKind::from_db_code(2), SectionKind::Show);
        assert_eq!(SectionKind::from_db_code(8), SectionKind::Artist);
        assert!(!SectionKind::from_db_code(13).is_supported());
    }

    #[test]
    fn test_item_type_codes() {
        assert_eq!(SectionKind::Movie.item_type_code(), Some(1));
        assert_eq!(SectionKind::Show.item_type_code(), Some(4));
        assert_eq!(SectionKind::Artist.item_type_code(), Some(10));
        assert_eq!(SectionKind::from_api("photo").item_type_code(), None);
    }
}
