use swim_core::models::Stroke;

pub trait StrokeMapper {
    fn map_stroke(&self, source_name: &str) -> Option<Stroke>;
}

/// Event names as printed by the results site, e.g. "200 Individual Medley".
pub struct ResultsSiteStrokeMapper;

impl StrokeMapper for ResultsSiteStrokeMapper {
    fn map_stroke(&self, name: &str) -> Option<Stroke> {
        if name.contains("Freestyle") {
            Some(Stroke::Freestyle)
        } else if name.contains("Backstroke") {
            Some(Stroke::Backstroke)
        } else if name.contains("Breaststroke") {
            Some(Stroke::Breaststroke)
        } else if name.contains("Butterfly") {
            Some(Stroke::Butterfly)
        } else if name.contains("Individual") {
            Some(Stroke::IndividualMedley)
        } else {
            None
        }
    }
}

/// Loose stroke column of a standards spreadsheet: "Free", "Fly", "IM", ...
pub struct SpreadsheetStrokeMapper;

impl StrokeMapper for SpreadsheetStrokeMapper {
    fn map_stroke(&self, name: &str) -> Option<Stroke> {
        let name = name.to_lowercase();
        if name.contains("free") {
            Some(Stroke::Freestyle)
        } else if name.contains("back") {
            Some(Stroke::Backstroke)
        } else if name.contains("breast") {
            Some(Stroke::Breaststroke)
        } else if name.contains("fly") || name.contains("butter") {
            Some(Stroke::Butterfly)
        } else if name.contains("medley") || name.contains("im") {
            Some(Stroke::IndividualMedley)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_site_names() {
        let mapper = ResultsSiteStrokeMapper;
        assert_eq!(mapper.map_stroke("Freestyle"), Some(Stroke::Freestyle));
        assert_eq!(mapper.map_stroke("Individual Medley"), Some(Stroke::IndividualMedley));
        assert_eq!(mapper.map_stroke("Butterfly"), Some(Stroke::Butterfly));
        assert_eq!(mapper.map_stroke("freestyle"), None);
        assert_eq!(mapper.map_stroke("Skins"), None);
    }

    #[test]
    fn test_spreadsheet_names() {
        let mapper = SpreadsheetStrokeMapper;
        assert_eq!(mapper.map_stroke("FREE"), Some(Stroke::Freestyle));
        assert_eq!(mapper.map_stroke("Back"), Some(Stroke::Backstroke));
        assert_eq!(mapper.map_stroke("Breast"), Some(Stroke::Breaststroke));
        assert_eq!(mapper.map_stroke("Fly"), Some(Stroke::Butterfly));
        assert_eq!(mapper.map_stroke("Butterfly"), Some(Stroke::Butterfly));
        assert_eq!(mapper.map_stroke("IM"), Some(Stroke::IndividualMedley));
        assert_eq!(mapper.map_stroke("Ind. Medley"), Some(Stroke::IndividualMedley));
        assert_eq!(mapper.map_stroke("Relay"), None);
    }
}
