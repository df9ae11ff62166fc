//! Static, read-only catalogue of checklist questions grouped by area and subarea.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

type Subareas = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    areas: BTreeMap<String, Subareas>,
}

impl QuestionBank {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn areas(&self) -> impl Iterator<Item = &str> {
        self.areas.keys().map(String::as_str)
    }

    /// Subareas of `area`, or `None` when the area is unset or unknown.
    pub fn subareas(&self, area: &str) -> Option<impl Iterator<Item = &str>> {
        self.areas
            .get(area)
            .map(|subareas| subareas.keys().map(String::as_str))
    }

    pub fn contains_area(&self, area: &str) -> bool {
        self.areas.contains_key(area)
    }

    pub fn contains_subarea(&self, area: &str, subarea: &str) -> bool {
        self.questions(area, subarea).is_some()
    }

    pub fn questions(&self, area: &str, subarea: &str) -> Option<&[String]> {
        self.areas
            .get(area)?
            .get(subarea)
            .map(Vec::as_slice)
    }

    /// Number of answers a complete submission needs; zero when the selection
    /// does not resolve to a question list.
    pub fn required_answers(&self, area: &str, subarea: &str) -> usize {
        self.questions(area, subarea).map_or(0, <[String]>::len)
    }

    pub fn area_label(area: &str) -> String {
        let mut chars = area.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> QuestionBank {
        QuestionBank::from_json_str(
            r#"{
                "seguranca": {
                    "epi": ["Usa capacete?", "Usa luvas?", "Usa óculos?"],
                    "sinalizacao": ["Placas visíveis?"]
                },
                "qualidade": { "inspecao": ["Peça conforme?", "Registro preenchido?"] }
            }"#,
        )
        .expect("bank json")
    }

    #[test]
    fn resolves_question_lists_by_area_and_subarea() {
        let bank = bank();
        assert_eq!(bank.required_answers("seguranca", "epi"), 3);
        assert_eq!(bank.required_answers("qualidade", "inspecao"), 2);
        assert_eq!(
            bank.questions("seguranca", "sinalizacao"),
            Some(&["Placas visíveis?".to_string()][..])
        );
    }

    #[test]
    fn unset_or_unknown_selection_requires_zero_answers() {
        let bank = bank();
        assert_eq!(bank.questions("", ""), None);
        assert_eq!(bank.required_answers("", ""), 0);
        assert_eq!(bank.required_answers("seguranca", ""), 0);
        assert_eq!(bank.required_answers("logistica", "epi"), 0);
        assert_eq!(bank.required_answers("qualidade", "epi"), 0);
    }

    #[test]
    fn subareas_are_scoped_to_their_area() {
        let bank = bank();
        let subareas: Vec<_> = bank.subareas("seguranca").expect("area").collect();
        assert_eq!(subareas, vec!["epi", "sinalizacao"]);
        assert!(bank.subareas("").is_none());
        assert!(bank.contains_subarea("qualidade", "inspecao"));
        assert!(!bank.contains_subarea("seguranca", "inspecao"));
    }

    #[test]
    fn area_label_capitalizes_first_character() {
        assert_eq!(QuestionBank::area_label("seguranca"), "Seguranca");
        assert_eq!(QuestionBank::area_label("ética"), "Ética");
        assert_eq!(QuestionBank::area_label(""), "");
    }
}
