/// Type filters offered by the viewer and the predicate they apply.
///
/// Category filters use closed extension lists evaluated against a record's
/// own `extension`, independent of its scan-time `category`.
/// `assets/explorer.js` carries the same lists.
use crate::export::FlatRecord;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".tiff", ".webp", ".heic", ".ico",
];

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".pages", ".xls", ".xlsx", ".csv", ".ppt",
    ".pptx",
];

pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".avi", ".mov", ".mkv", ".wmv", ".flv", ".webm", ".m4v", ".3gp", ".mpg", ".mpeg",
];

pub const AUDIO_EXTENSIONS: &[&str] = &[
    ".mp3", ".wav", ".m4a", ".flac", ".aac", ".ogg", ".wma", ".mp2", ".aiff",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Folders,
    Files,
    Images,
    Documents,
    Videos,
    Audio,
}

impl Filter {
    /// Every filter, in toolbar order.
    pub const ALL: [Filter; 7] = [
        Filter::All,
        Filter::Folders,
        Filter::Files,
        Filter::Images,
        Filter::Documents,
        Filter::Videos,
        Filter::Audio,
    ];

    /// Key used in the document's `data-filter` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Folders => "folders",
            Self::Files => "files",
            Self::Images => "images",
            Self::Documents => "documents",
            Self::Videos => "videos",
            Self::Audio => "audio",
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Folders => "Folders",
            Self::Files => "Files",
            Self::Images => "Images",
            Self::Documents => "Documents",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
        }
    }

    /// Closed extension list for the category filters, `None` otherwise.
    pub fn extensions(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Images => Some(IMAGE_EXTENSIONS),
            Self::Documents => Some(DOCUMENT_EXTENSIONS),
            Self::Videos => Some(VIDEO_EXTENSIONS),
            Self::Audio => Some(AUDIO_EXTENSIONS),
            Self::All | Self::Folders | Self::Files => None,
        }
    }

    /// Whether `record` is shown under this filter and `search` term.
    ///
    /// A non-empty search term must occur in the name, case-insensitively.
    pub fn accepts(self, record: &FlatRecord, search: &str) -> bool {
        if !search.is_empty()
            && !record
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
        {
            return false;
        }

        match self {
            Self::All => true,
            Self::Folders => record.is_directory,
            Self::Files => !record.is_directory,
            _ => {
                let ext = record.extension.to_lowercase();
                !record.is_directory
                    && self
                        .extensions()
                        .is_some_and(|list| list.contains(&ext.as_str()))
            }
        }
    }
}
