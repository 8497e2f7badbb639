/// Character encoding declared for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharacterEncoding {
    Ascii,
    Latin1,
    Utf8,
    #[default]
    Unknown,
}

impl CharacterEncoding {
    pub fn as_code(&self) -> &'static str {
        match self {
            CharacterEncoding::Ascii => "ascii",
            CharacterEncoding::Latin1 => "latin1",
            CharacterEncoding::Utf8 => "utf8",
            CharacterEncoding::Unknown => "UNKNOWN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ascii" => Some(CharacterEncoding::Ascii),
            "latin1" => Some(CharacterEncoding::Latin1),
            "utf8" => Some(CharacterEncoding::Utf8),
            "UNKNOWN" => Some(CharacterEncoding::Unknown),
            _ => None,
        }
    }
}
