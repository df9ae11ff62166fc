use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AnswerLabel, Answers};

/// Row inserted into the `dto_registros` table for one completed checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub data: NaiveDate,
    pub supervisor: String,
    pub colaborador: String,
    pub funcao: String,
    pub area: String,
    pub subarea: String,
    #[serde(flatten)]
    pub perguntas: BTreeMap<String, AnswerLabel>,
}

impl SubmissionRecord {
    pub fn question_column(index: usize) -> String {
        format!("pergunta_{}", index + 1)
    }

    /// Shifts every 0-based answer index up by one into its `pergunta_N` column.
    pub fn question_columns(answers: &Answers) -> BTreeMap<String, AnswerLabel> {
        answers
            .iter()
            .map(|(index, label)| (Self::question_column(*index), *label))
            .collect()
    }

    pub fn answer(&self, question_number: usize) -> Option<AnswerLabel> {
        self.perguntas
            .get(&format!("pergunta_{question_number}"))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flat_row_with_iso_date() {
        let answers = Answers::from([(1, AnswerLabel::Nok), (0, AnswerLabel::Ok)]);
        let record = SubmissionRecord {
            data: NaiveDate::from_ymd_opt(2024, 12, 25).expect("date"),
            supervisor: "Ana".into(),
            colaborador: "Bruno".into(),
            funcao: "Operador".into(),
            area: "seguranca".into(),
            subarea: "epi".into(),
            perguntas: SubmissionRecord::question_columns(&answers),
        };

        let value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(value["data"], "2024-12-25");
        assert_eq!(value["colaborador"], "Bruno");
        assert_eq!(value["funcao"], "Operador");
        assert_eq!(value["pergunta_1"], "OK");
        assert_eq!(value["pergunta_2"], "NOK");
        assert!(value.get("perguntas").is_none());
        assert!(value.get("pergunta_0").is_none());
    }
}
