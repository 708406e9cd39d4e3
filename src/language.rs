use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two input languages the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
}

/// Raised when a language selector is outside the two recognized values.
/// Carries the raw selector so the error message can echo it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Tag sent to the speech-recognition backend.
    pub fn recognition_tag(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Spanish => "es-ES",
        }
    }

    /// Reverse of `recognition_tag`. An unknown tag is not an error at this
    /// level; the transcriber answers it with a sentinel result instead.
    pub fn from_recognition_tag(tag: &str) -> Option<Self> {
        match tag {
            "en-US" => Some(Language::English),
            "es-ES" => Some(Language::Spanish),
            _ => None,
        }
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "spanish" => Ok(Language::Spanish),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "english"),
            Language::Spanish => write!(f, "spanish"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert_eq!("ENGLISH".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Spanish".parse::<Language>().unwrap(), Language::Spanish);
    }

    #[test]
    fn rejects_unknown_selector() {
        let err = "german".parse::<Language>().unwrap_err();
        assert_eq!(err, UnknownLanguage("german".to_string()));
    }

    #[test]
    fn recognition_tags_round_trip() {
        assert_eq!(Language::English.recognition_tag(), "en-US");
        assert_eq!(Language::Spanish.recognition_tag(), "es-ES");
        assert_eq!(
            Language::from_recognition_tag("es-ES"),
            Some(Language::Spanish)
        );
        assert_eq!(Language::from_recognition_tag("fr-FR"), None);
    }
}
