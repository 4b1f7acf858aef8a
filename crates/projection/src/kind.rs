use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Mercator.
    #[serde(rename = "flat", alias = "mercator")]
    Flat,
    /// Orthographic, back hemisphere clipped.
    #[serde(rename = "globe", alias = "orthographic")]
    Globe,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 2] = [ProjectionKind::Flat, ProjectionKind::Globe];

    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::Flat => "flat",
            ProjectionKind::Globe => "globe",
        }
    }

    pub fn is_rotatable(self) -> bool {
        matches!(self, ProjectionKind::Globe)
    }
}

impl std::fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    InvalidProjection(String),
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionError::InvalidProjection(name) => write!(
                f,
                "invalid projection '{name}' (expected flat, mercator, globe or orthographic)"
            ),
        }
    }
}

impl std::error::Error for ProjectionError {}

impl std::str::FromStr for ProjectionKind {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" | "mercator" => Ok(ProjectionKind::Flat),
            "globe" | "orthographic" => Ok(ProjectionKind::Globe),
            _ => Err(ProjectionError::InvalidProjection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectionError, ProjectionKind};

    #[test]
    fn parses_both_names_of_each_kind() {
        assert_eq!("flat".parse(), Ok(ProjectionKind::Flat));
        assert_eq!("Mercator".parse(), Ok(ProjectionKind::Flat));
        assert_eq!("globe".parse(), Ok(ProjectionKind::Globe));
        assert_eq!(" orthographic ".parse(), Ok(ProjectionKind::Globe));
    }

    #[test]
    fn unknown_name_is_invalid_projection() {
        let err = "albers".parse::<ProjectionKind>().unwrap_err();
        assert_eq!(err, ProjectionError::InvalidProjection("albers".to_string()));
        assert!(err.to_string().contains("albers"));
    }

    #[test]
    fn serde_accepts_aliases() {
        let k: ProjectionKind = serde_json::from_str("\"orthographic\"").expect("parse");
        assert_eq!(k, ProjectionKind::Globe);
        assert_eq!(serde_json::to_string(&ProjectionKind::Flat).expect("ser"), "\"flat\"");
    }
}
