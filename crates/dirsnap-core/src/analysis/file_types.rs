/// File type categorisation based on file extensions.
///
/// The category drives the icon shown next to each entry in the generated
/// document. Type *filtering* in the viewer deliberately uses its own closed
/// extension lists (see [`crate::browse::Filter`]), not this category.
use serde::{Deserialize, Serialize};

/// Broad file type categories, serialised as lowercase names
/// (`"folder"`, `"image"`, ...). The names double as CSS icon classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Folder,
    Pdf,
    Word,
    Text,
    Spreadsheet,
    Presentation,
    Image,
    Video,
    Audio,
    Archive,
    Code,
    Executable,
    Generic,
}

impl FileCategory {
    /// Lowercase name as it appears in the embedded payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Text => "text",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Archive => "archive",
            Self::Code => "code",
            Self::Executable => "executable",
            Self::Generic => "generic",
        }
    }
}

/// Categorise a file extension (with or without the leading dot).
///
/// Zero-heap-allocation hot path: extensions are lowercased into a fixed-size
/// stack buffer (`[u8; 16]`) rather than allocating a `String`. Extensions
/// longer than 16 bytes are treated as `Generic`.
pub fn categorise_extension(ext: &str) -> FileCategory {
    let bytes = ext.strip_prefix('.').unwrap_or(ext).as_bytes();
    if bytes.is_empty() || bytes.len() > 16 {
        return FileCategory::Generic;
    }

    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return FileCategory::Generic,
    };

    match lower_str {
        "pdf" => FileCategory::Pdf,
        "doc" | "docx" => FileCategory::Word,
        "txt" | "rtf" | "odt" | "pages" => FileCategory::Text,
        "xls" | "xlsx" | "csv" | "numbers" => FileCategory::Spreadsheet,
        "ppt" | "pptx" | "key" => FileCategory::Presentation,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" | "svg" | "ico" | "webp" | "heic" => {
            FileCategory::Image
        }
        "mp4" | "avi" | "mov" | "mkv" | "wmv" | "flv" | "webm" | "m4v" => FileCategory::Video,
        "mp3" | "wav" | "m4a" | "flac" | "aac" | "ogg" | "wma" => FileCategory::Audio,
        "zip" | "rar" | "7z" | "tar" | "gz" | "bz2" | "dmg" => FileCategory::Archive,
        "py" | "js" | "html" | "css" | "php" | "java" | "cpp" | "c" | "swift" | "go" | "rb"
        | "json" => FileCategory::Code,
        "exe" | "app" | "deb" | "rpm" | "msi" => FileCategory::Executable,
        _ => FileCategory::Generic,
    }
}
