//! Exam and question-practice record types
//!
//! Net scoring follows the exam convention: each wrong answer cancels a
//! quarter of a correct one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::generate_id;

/// Exam track, serialized as the client's tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamKind {
    #[serde(rename = "ags")]
    Ags,
    #[serde(rename = "oabt")]
    Oabt,
    /// Branch (alan) practice exams
    #[serde(rename = "brans")]
    Branch,
}

impl ExamKind {
    /// Section catalog for this exam track: (key, label, question count)
    ///
    /// Branch exams have no fixed catalog; sections are free-form.
    pub fn sections(&self) -> &'static [ExamSection] {
        match self {
            Self::Ags => AGS_SECTIONS,
            Self::Oabt => OABT_SECTIONS,
            Self::Branch => &[],
        }
    }
}

impl std::fmt::Display for ExamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ags => write!(f, "ags"),
            Self::Oabt => write!(f, "oabt"),
            Self::Branch => write!(f, "brans"),
        }
    }
}

/// One section of an exam catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSection {
    pub key: &'static str,
    pub label: &'static str,
    pub question_count: u32,
}

const AGS_SECTIONS: &[ExamSection] = &[
    ExamSection { key: "sozelMantik", label: "Sözel Mantık", question_count: 15 },
    ExamSection { key: "sayisalMantik", label: "Sayısal Mantık", question_count: 15 },
    ExamSection { key: "tarih", label: "Tarih", question_count: 6 },
    ExamSection { key: "cografya", label: "Coğrafya", question_count: 6 },
    ExamSection { key: "egitimBilimleri", label: "Eğitim Bilimleri", question_count: 30 },
    ExamSection { key: "mevzuat", label: "Mevzuat", question_count: 8 },
];

const OABT_SECTIONS: &[ExamSection] = &[
    ExamSection { key: "analiz", label: "Analiz", question_count: 18 },
    ExamSection { key: "cebir", label: "Cebir", question_count: 12 },
    ExamSection { key: "geometri", label: "Geometri", question_count: 12 },
    ExamSection { key: "uygulamaliMatematik", label: "Uygulamalı Matematik", question_count: 8 },
];

/// Net score: correct minus a quarter per wrong answer
pub fn net_score(correct: u32, wrong: u32) -> f64 {
    correct as f64 - wrong as f64 / 4.0
}

/// A question-practice session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    /// Unique identifier
    pub id: String,

    /// Practice date
    pub date: NaiveDate,

    /// Exam track practiced for
    pub exam_type: ExamKind,

    /// Section key (client catalog key or free-form)
    pub subject: String,

    /// Section display label
    pub subject_label: String,

    /// Questions attempted
    pub total_questions: u32,

    /// Correct answers
    pub correct_answers: u32,

    /// Wrong answers
    pub wrong_answers: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}

impl QuestionRecord {
    /// Net score for this session
    pub fn net(&self) -> f64 {
        net_score(self.correct_answers, self.wrong_answers)
    }

    /// Unanswered questions in this session
    pub fn empty_count(&self) -> u32 {
        self.total_questions
            .saturating_sub(self.correct_answers + self.wrong_answers)
    }
}

/// Per-section result inside a full exam record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectResult {
    pub subject: String,
    #[serde(rename = "subjectLabel")]
    pub subject_label: String,
    pub correct: u32,
    pub wrong: u32,
    pub empty: u32,
    /// Net as the client computed and stored it
    pub net: f64,
}

impl SubjectResult {
    /// Build a section result, computing the net
    pub fn new(subject: impl Into<String>, subject_label: impl Into<String>, correct: u32, wrong: u32, empty: u32) -> Self {
        Self {
            subject: subject.into(),
            subject_label: subject_label.into(),
            correct,
            wrong,
            empty,
            net: net_score(correct, wrong),
        }
    }
}

/// A full practice-exam record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    /// Unique identifier
    pub id: String,

    /// Exam date
    pub date: NaiveDate,

    /// Exam track
    pub exam_type: ExamKind,

    /// Exam name as entered by the user
    pub exam_name: String,

    /// Per-section results
    #[serde(default)]
    pub results: Vec<SubjectResult>,

    /// Sum of section nets
    pub total_net: f64,

    /// Topics marked wrong, for review planning
    #[serde(default)]
    pub wrong_topics: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExamRecord {
    /// Create a record from section results, with generated ID
    pub fn new(exam_name: impl Into<String>, exam_type: ExamKind, date: NaiveDate, results: Vec<SubjectResult>) -> Self {
        let exam_name = exam_name.into();
        let total_net = results.iter().map(|r| r.net).sum();
        Self {
            id: generate_id("exam", &exam_name),
            date,
            exam_type,
            exam_name,
            results,
            total_net,
            wrong_topics: Vec::new(),
            notes: None,
        }
    }
}
