//! CLI value types

/// Output format for schedule previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for PreviewFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(PreviewFormat::Table),
            "json" => Ok(PreviewFormat::Json),
            _ => Err(format!("Unknown preview format: {s}. Valid formats: table, json")),
        }
    }
}
