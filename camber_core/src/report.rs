//! # Report Accumulator
//!
//! Collects formatted calculation output into an ordered document:
//! sections in first-write order, each holding labeled lines and, for
//! subsystems that report per-calculation blocks, one level of nested
//! groups.
//!
//! Recording into an existing section merges: shared keys are overwritten
//! in place, untouched keys keep their position, new keys append. Repeating
//! a calculation therefore updates its lines without reshuffling the
//! document.
//!
//! Rendering walks sections in insertion order and translates keys through
//! the label table; keys with no translation pass through verbatim.

use crate::labels;
use serde::{Deserialize, Serialize};

/// One report line: a formatted value, or a named sub-block of lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Line(String),
    Group(Vec<(String, String)>),
}

/// An ordered report section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportSection {
    entries: Vec<(String, ReportValue)>,
}

impl ReportSection {
    /// Merge a field in, overwriting in place when the key exists.
    ///
    /// A group merged onto an existing group merges key-wise the same way.
    fn merge(&mut self, key: String, value: ReportValue) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            match (&mut slot.1, value) {
                (ReportValue::Group(existing), ReportValue::Group(incoming)) => {
                    for (k, v) in incoming {
                        if let Some(inner) = existing.iter_mut().find(|(ek, _)| *ek == k) {
                            inner.1 = v;
                        } else {
                            existing.push((k, v));
                        }
                    }
                }
                (slot_value, value) => *slot_value = value,
            }
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&ReportValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReportValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The accumulated report document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    sections: Vec<(String, ReportSection)>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge fields into a section, creating it at the end on first write.
    pub fn record(&mut self, section: &str, fields: Vec<(String, ReportValue)>) {
        let idx = match self.sections.iter().position(|(name, _)| name == section) {
            Some(i) => i,
            None => {
                self.sections
                    .push((section.to_string(), ReportSection::default()));
                self.sections.len() - 1
            }
        };
        for (key, value) in fields {
            self.sections[idx].1.merge(key, value);
        }
    }

    pub fn section(&self, name: &str) -> Option<&ReportSection> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Sections in first-write order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &ReportSection)> {
        self.sections.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Plain-text rendering: section headers, indented lines, nested groups
    /// double-indented. Labels go through the translation table.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (name, section) in self.sections() {
            out.push_str(&format!("=== {} ===\n", labels::section_title(name)));
            for (key, value) in section.iter() {
                match value {
                    ReportValue::Line(line) => {
                        out.push_str(&format!("  {}: {}\n", labels::field_label(key), line));
                    }
                    ReportValue::Group(fields) => {
                        out.push_str(&format!("  {}:\n", labels::field_label(key)));
                        for (k, v) in fields {
                            out.push_str(&format!("    {}: {}\n", labels::field_label(k), v));
                        }
                    }
                }
            }
            out.push('\n');
        }
        out
    }

    /// HTML rendering, the document handed to the print path
    pub fn render_html(&self) -> String {
        let mut out = String::from("<html><body><h1>Отчет по расчетам</h1>");
        for (name, section) in self.sections() {
            out.push_str(&format!("<h2>{}</h2><ul>", labels::section_title(name)));
            for (key, value) in section.iter() {
                match value {
                    ReportValue::Line(line) => {
                        out.push_str(&format!(
                            "<li><b>{}:</b> {}</li>",
                            labels::field_label(key),
                            html_escape(line)
                        ));
                    }
                    ReportValue::Group(fields) => {
                        out.push_str(&format!("<li><b>{}:</b><ul>", labels::field_label(key)));
                        for (k, v) in fields {
                            out.push_str(&format!(
                                "<li>{}: {}</li>",
                                labels::field_label(k),
                                html_escape(v)
                            ));
                        }
                        out.push_str("</ul></li>");
                    }
                }
            }
            out.push_str("</ul>");
        }
        out.push_str("</body></html>");
        out
    }

    /// JSON snapshot stored in the `reports` table at export time
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(s: &str) -> ReportValue {
        ReportValue::Line(s.to_string())
    }

    #[test]
    fn test_sections_keep_first_write_order() {
        let mut report = Report::new();
        report.record("braking", vec![("a".into(), line("1"))]);
        report.record("engine", vec![("b".into(), line("2"))]);
        report.record("braking", vec![("c".into(), line("3"))]);

        let names: Vec<&str> = report.sections().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["braking", "engine"]);
    }

    #[test]
    fn test_merge_overwrites_in_place() {
        let mut report = Report::new();
        report.record(
            "engine",
            vec![
                ("power_hp".into(), line("150.0 л.с.")),
                ("efficiency".into(), line("77.5%")),
            ],
        );
        report.record("engine", vec![("efficiency".into(), line("80.1%"))]);

        let section = report.section("engine").unwrap();
        let keys: Vec<&str> = section.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["power_hp", "efficiency"]);
        assert_eq!(section.get("efficiency"), Some(&line("80.1%")));
    }

    #[test]
    fn test_group_merge_is_keywise() {
        let mut report = Report::new();
        report.record(
            "dynamics",
            vec![(
                "traction_force".into(),
                ReportValue::Group(vec![("torque".into(), "300 Н·м".into())]),
            )],
        );
        report.record(
            "dynamics",
            vec![(
                "traction_force".into(),
                ReportValue::Group(vec![
                    ("torque".into(), "350 Н·м".into()),
                    ("traction_force".into(), "3900.00 Н".into()),
                ]),
            )],
        );

        match report.section("dynamics").unwrap().get("traction_force") {
            Some(ReportValue::Group(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0], ("torque".into(), "350 Н·м".into()));
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_render_text_nests_groups() {
        let mut report = Report::new();
        report.record(
            "dynamics",
            vec![(
                "acceleration".into(),
                ReportValue::Group(vec![("max_speed".into(), "231.4 км/ч".into())]),
            )],
        );
        let text = report.render_text();
        assert!(text.contains("    "));
        assert!(text.contains("231.4 км/ч"));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut report = Report::new();
        report.record("engine", vec![("efficiency".into(), line("77.5%"))]);
        let snapshot = report.to_snapshot().unwrap();
        let back: Report = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(report, back);
    }
}
