//! JSON format exporter.

use crate::differ::DiffReport;
use crate::types::ParsedUnit;

/// Export a diff report to JSON.
pub fn export_report(report: &DiffReport, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

/// Export a parsed unit to JSON.
pub fn export_parsed(unit: &ParsedUnit, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(unit)
    } else {
        serde_json::to_string(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::differ::{DiffClass, DiffMethod, DiffRecord};
    use crate::parser::{JavaParser, Parser};
    use crate::types::SourceUnit;

    #[test]
    fn test_export_report() {
        let report = DiffReport::new(
            "API.java",
            vec![
                DiffRecord::Class(DiffClass::modified(
                    "API",
                    vec![DiffMethod::added("API", "recover")],
                )),
                DiffRecord::Method(DiffMethod::added("API", "recover")),
            ],
            0.5,
        );

        let output = export_report(&report, false).unwrap();
        assert!(output.contains("\"filename\":\"API.java\""));
        assert!(output.contains("\"method_b\":\"recover\""));

        let back: DiffReport = serde_json::from_str(&output).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_export_parsed_pretty() {
        let unit = SourceUnit::new("A.java", "class A { void f() { } }");
        let parsed = JavaParser.parse_unit(&unit).unwrap();

        let output = export_parsed(&parsed, true).unwrap();
        assert!(output.contains('\n'));
        assert!(output.contains("\"text\": \"f() { }\""));
    }
}
