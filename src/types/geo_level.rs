/// Census geography level for ACS tabular uploads. The code doubles as the
/// path segment in boundary-lookup requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoLevel {
    Tracts,
    CountySubdivisions,
    Counties,
    States,
    Places,
}

impl GeoLevel {
    pub const ALL: [GeoLevel; 5] = [
        GeoLevel::Tracts,
        GeoLevel::CountySubdivisions,
        GeoLevel::Counties,
        GeoLevel::States,
        GeoLevel::Places,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            GeoLevel::Tracts => "tracts",
            GeoLevel::CountySubdivisions => "county-subdivisions",
            GeoLevel::Counties => "counties",
            GeoLevel::States => "states",
            GeoLevel::Places => "places",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| level.as_code() == code)
    }

    /// Reference label carried by every feature imported at this level,
    /// e.g. "Census counties". Also the dedup key prefix for boundary reuse.
    pub fn reference_label(&self) -> String {
        format!("Census {}", self.as_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for level in GeoLevel::ALL {
            assert_eq!(GeoLevel::from_code(level.as_code()), Some(level));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(GeoLevel::from_code("blocks"), None);
    }

    #[test]
    fn reference_label_names_the_level() {
        assert_eq!(GeoLevel::Counties.reference_label(), "Census counties");
    }
}
