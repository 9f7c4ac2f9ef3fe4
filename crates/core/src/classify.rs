use crate::models::{Assessment, UrgencyLevel};

// Phrases signaling acute, potentially life-threatening conditions. Scanned
// in listed order; the first match anywhere in the text wins.
const HIGH_URGENCY_KEYWORDS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "shortness of breath",
    "severe pain",
    "unconscious",
    "bleeding heavily",
    "stroke",
    "heart attack",
    "can't breathe",
    "choking",
    "severe headache",
    "loss of consciousness",
    "severe bleeding",
];

// Broader symptom words checked only when no high-urgency phrase matched.
const MODERATE_URGENCY_KEYWORDS: &[&str] = &[
    "fever",
    "nausea",
    "vomiting",
    "abdominal pain",
    "headache",
    "dizziness",
    "rash",
    "infection",
    "injury",
    "pain",
    "swelling",
    "burning",
    "ache",
    "sore",
    "hurt",
];

/// Deterministic keyword classifier. Never fails: any text maps to one of
/// the three canned assessments.
///
/// Matching is case-insensitive substring containment with no tokenization,
/// so a keyword embedded inside an unrelated longer word still matches.
/// Which keyword matched is discarded once the tier is known; guidance text
/// is fixed per tier.
pub fn classify_symptoms_rules(text: &str) -> Assessment {
    let lower = text.to_lowercase();

    if contains_any(&lower, HIGH_URGENCY_KEYWORDS) {
        return high_urgency_assessment();
    }

    if contains_any(&lower, MODERATE_URGENCY_KEYWORDS) {
        return moderate_urgency_assessment();
    }

    low_urgency_assessment()
}

fn high_urgency_assessment() -> Assessment {
    Assessment {
        urgency_level: UrgencyLevel::High,
        summary: "Your symptoms suggest a potentially serious condition that requires immediate medical attention. Please seek emergency care right away.".to_string(),
        recommendations: vec![
            "Seek emergency care immediately".to_string(),
            "Call 911 if symptoms are severe".to_string(),
            "Do not delay medical treatment".to_string(),
            "Have someone accompany you if possible".to_string(),
        ],
        reasoning: "Symptoms indicate a potentially urgent medical condition that requires immediate professional evaluation.".to_string(),
    }
}

fn moderate_urgency_assessment() -> Assessment {
    Assessment {
        urgency_level: UrgencyLevel::Moderate,
        summary: "Based on your symptoms, this appears to be a moderate concern that should be addressed within 24 hours by a healthcare professional.".to_string(),
        recommendations: vec![
            "Visit an urgent care center or your primary care doctor".to_string(),
            "Monitor symptoms closely for any changes".to_string(),
            "Seek immediate care if symptoms worsen significantly".to_string(),
            "Stay hydrated and get adequate rest".to_string(),
        ],
        reasoning: "Symptoms suggest a condition that needs medical attention but is not immediately life-threatening.".to_string(),
    }
}

fn low_urgency_assessment() -> Assessment {
    Assessment {
        urgency_level: UrgencyLevel::Low,
        summary: "Your symptoms appear to be mild and may be managed with self-care, but consider consulting a healthcare provider if they persist or worsen.".to_string(),
        recommendations: vec![
            "Monitor symptoms for any changes or worsening".to_string(),
            "Consider appropriate over-the-counter remedies".to_string(),
            "Schedule a routine appointment with your doctor if symptoms persist".to_string(),
            "Maintain good hydration, nutrition, and rest".to_string(),
        ],
        reasoning: "Symptoms appear to be mild and may resolve with appropriate self-care measures.".to_string(),
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_high_regardless_of_casing() {
        let assessment = classify_symptoms_rules("I have CHEST PAIN");
        assert_eq!(assessment.urgency_level, UrgencyLevel::High);
    }

    #[test]
    fn classifies_moderate_on_table_b_words() {
        let assessment = classify_symptoms_rules("I have a fever and a headache");
        assert_eq!(assessment.urgency_level, UrgencyLevel::Moderate);
    }

    #[test]
    fn high_table_wins_even_when_moderate_word_appears_first() {
        // "fever" appears before "chest pain" in the text, but the high table
        // is scanned in full before the moderate table is consulted.
        let assessment = classify_symptoms_rules("mild fever and some chest pain");
        assert_eq!(assessment.urgency_level, UrgencyLevel::High);
    }

    #[test]
    fn defaults_to_low_when_nothing_matches() {
        let assessment = classify_symptoms_rules("I feel great");
        assert_eq!(assessment.urgency_level, UrgencyLevel::Low);
        assert_eq!(assessment.recommendations.len(), 4);
    }

    #[test]
    fn is_deterministic_for_identical_input() {
        let first = classify_symptoms_rules("nausea after dinner");
        let second = classify_symptoms_rules("nausea after dinner");
        assert_eq!(first, second);
    }

    #[test]
    fn substring_containment_matches_inside_longer_words() {
        // Known limitation, kept on purpose: "backache" contains "ache".
        let assessment = classify_symptoms_rules("a nagging backache");
        assert_eq!(assessment.urgency_level, UrgencyLevel::Moderate);
    }

    #[test]
    fn unrelated_text_does_not_false_positive() {
        let assessment = classify_symptoms_rules("feeling scared about tomorrow");
        assert_eq!(assessment.urgency_level, UrgencyLevel::Low);
    }
}
