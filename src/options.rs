use serde::Deserialize;

/// Options for reading GPX XML into the document model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Fail on the first invalid or missing value instead of logging and
    /// skipping it (default: false)
    pub strict: bool,
}

impl ReadOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Options for writing the document model back to GPX XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; 0 writes everything on one line (default: 2)
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Options for GPX to GeoJSON conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Include elevation as the 3rd coordinate value (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,

    /// Include timestamps in coordinateProperties.times (default: true)
    #[serde(default = "default_true")]
    pub include_time: bool,

    /// Include descriptive and fix-quality fields in properties (default: true)
    #[serde(default = "default_true")]
    pub include_metadata: bool,

    /// Which GPX element types to convert (default: all)
    #[serde(default)]
    pub types: Option<Vec<GpxElementType>>,

    /// Join track segments into a single MultiLineString (default: false)
    #[serde(default)]
    pub join_track_segments: bool,

    /// Reject invalid input instead of skipping it (default: false)
    #[serde(default)]
    pub strict: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            include_elevation: true,
            include_time: true,
            include_metadata: true,
            types: None,
            join_track_segments: false,
            strict: false,
        }
    }
}

impl ConvertOptions {
    pub fn should_include(&self, element_type: GpxElementType) -> bool {
        match &self.types {
            None => true,
            Some(types) => types.contains(&element_type),
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            strict: self.strict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpxElementType {
    Waypoint,
    Route,
    Track,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_defaults_from_empty_object() {
        let opts: ConvertOptions = serde_json::from_str("{}").unwrap();
        assert!(opts.include_elevation);
        assert!(opts.include_time);
        assert!(opts.include_metadata);
        assert!(!opts.join_track_segments);
        assert!(!opts.read_options().strict);
        assert!(opts.should_include(GpxElementType::Route));
    }

    #[test]
    fn test_convert_options_camel_case() {
        let opts: ConvertOptions = serde_json::from_str(
            r#"{"joinTrackSegments": true, "strict": true, "types": ["track"]}"#,
        )
        .unwrap();
        assert!(opts.join_track_segments);
        assert_eq!(opts.read_options(), ReadOptions::strict());
        assert!(opts.should_include(GpxElementType::Track));
        assert!(!opts.should_include(GpxElementType::Waypoint));
    }

    #[test]
    fn test_write_options_default_indent() {
        assert_eq!(WriteOptions::default().indent, 2);
    }
}
