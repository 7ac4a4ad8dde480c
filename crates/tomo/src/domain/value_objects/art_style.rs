//! ArtStyle - Image generation style selector

use serde::{Deserialize, Serialize};

/// Art style for generated images
///
/// Closed enumeration: every style maps to exactly one checkpoint config.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArtStyle {
    #[default]
    Anime,
    Realistic,
}

impl std::fmt::Display for ArtStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtStyle::Anime => write!(f, "anime"),
            ArtStyle::Realistic => write!(f, "realistic"),
        }
    }
}

impl std::str::FromStr for ArtStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anime" => Ok(ArtStyle::Anime),
            "realistic" => Ok(ArtStyle::Realistic),
            _ => Err(format!("Unknown art style: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        assert_eq!("anime".parse::<ArtStyle>().unwrap(), ArtStyle::Anime);
        assert_eq!(
            "Realistic".parse::<ArtStyle>().unwrap(),
            ArtStyle::Realistic
        );
        assert!("watercolor".parse::<ArtStyle>().is_err());
        assert_eq!(ArtStyle::Anime.to_string(), "anime");
    }
}
