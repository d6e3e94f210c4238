// ==========================================
// CycleWeave LCA - 循环度等级判定
// ==========================================
// 规则: >=80 A / >=60 B / >=40 C / 其余 D (阈值含边界)
// ==========================================

use crate::domain::types::GradeLetter;
use serde::Serialize;

/// 等级与标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub letter: GradeLetter,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GradeClassifier {}

impl GradeClassifier {
    pub fn new() -> Self {
        Self {}
    }

    pub fn classify(&self, score: f64) -> Grade {
        let (letter, label) = if score >= 80.0 {
            (GradeLetter::A, "Excellent")
        } else if score >= 60.0 {
            (GradeLetter::B, "Good")
        } else if score >= 40.0 {
            (GradeLetter::C, "Moderate")
        } else {
            (GradeLetter::D, "Needs Improvement")
        };

        Grade { letter, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        let classifier = GradeClassifier::new();

        assert_eq!(classifier.classify(80.0).letter, GradeLetter::A);
        assert_eq!(classifier.classify(79.0).letter, GradeLetter::B);
        assert_eq!(classifier.classify(60.0).letter, GradeLetter::B);
        assert_eq!(classifier.classify(59.0).letter, GradeLetter::C);
        assert_eq!(classifier.classify(40.0).letter, GradeLetter::C);
        assert_eq!(classifier.classify(39.0).letter, GradeLetter::D);
    }

    #[test]
    fn test_grade_labels() {
        let classifier = GradeClassifier::new();

        assert_eq!(classifier.classify(100.0).label, "Excellent");
        assert_eq!(classifier.classify(65.0).label, "Good");
        assert_eq!(classifier.classify(45.0).label, "Moderate");
        assert_eq!(classifier.classify(0.0).label, "Needs Improvement");
    }
}
