//! Choice options that point at other records (a project's client, an
//! issue's project).

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::short_id;

/// Labels for related records, each naming exactly one record.
///
/// Names shared by several records (compared case-insensitively) get the
/// record's short id appended, e.g. `Website audit (1a2b3c4d)`, so a label
/// never resolves to the wrong record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOptions {
    entries: Vec<(String, Uuid)>,
}

impl RecordOptions {
    pub fn new<'a>(records: impl IntoIterator<Item = (&'a str, Uuid)>) -> Self {
        let records: Vec<(&str, Uuid)> = records.into_iter().collect();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (name, _) in &records {
            *seen.entry(name.to_lowercase()).or_default() += 1;
        }
        let entries = records
            .into_iter()
            .map(|(name, id)| {
                let label = if seen.get(&name.to_lowercase()).copied().unwrap_or(0) > 1 {
                    format!("{name} ({})", short_id(id))
                } else {
                    name.to_string()
                };
                (label, id)
            })
            .collect();
        Self { entries }
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn label_for(&self, id: Uuid) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, candidate)| *candidate == id)
            .map(|(label, _)| label.as_str())
    }

    /// The record a label names; `None` for unknown labels.
    pub fn resolve(&self, label: &str) -> Option<Uuid> {
        let wanted = label.trim();
        self.entries
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(wanted))
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_names_stay_plain() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let options = RecordOptions::new([("Acme", a), ("Zed Inc", b)]);
        assert_eq!(options.labels(), vec!["Acme", "Zed Inc"]);
        assert_eq!(options.resolve("acme"), Some(a));
        assert_eq!(options.label_for(b), Some("Zed Inc"));
    }

    #[test]
    fn shared_names_get_short_ids() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let options = RecordOptions::new([("Website audit", a), ("website audit", b)]);
        let labels = options.labels();
        assert_eq!(labels[0], format!("Website audit ({})", short_id(a)));
        assert_eq!(labels[1], format!("website audit ({})", short_id(b)));

        assert_eq!(options.resolve("Website audit"), None);
        assert_eq!(options.resolve(&labels[1]), Some(b));
    }
}
