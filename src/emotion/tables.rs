//! Static emotion tables: face label map, display emoji and suggestion tips.

/// Label used when a face class index is not in the label map
pub const UNKNOWN_LABEL: &str = "unknown";

/// Emoji shown for a face prediction whose label has no emoji
pub const FACE_EMOJI_FALLBACK: &str = "🤔";

/// Emoji shown for a text prediction whose label has no emoji
pub const TEXT_EMOJI_FALLBACK: &str = "";

/// Face model class index -> emotion name
pub const FACE_LABELS: [(i64, &str); 6] = [
    (0, "joy"),
    (1, "sadness"),
    (2, "anger"),
    (3, "fear"),
    (4, "surprise"),
    (5, "neutral"),
];

/// Display data for one emotion
#[derive(Debug, Clone, Copy)]
pub struct EmotionInfo {
    /// Emotion name as produced by the models
    pub id: &'static str,
    pub emoji: &'static str,
    /// Short tips shown alongside the prediction
    pub suggestions: &'static [&'static str],
}

pub const EMOTIONS: &[EmotionInfo] = &[
    EmotionInfo {
        id: "joy",
        emoji: "😊",
        suggestions: &["Celebrate your happiness!", "Share your joy with someone."],
    },
    EmotionInfo {
        id: "sadness",
        emoji: "😢",
        suggestions: &["Talk to someone you trust.", "Try writing about how you feel."],
    },
    EmotionInfo {
        id: "anger",
        emoji: "😠",
        suggestions: &["Take deep breaths.", "Give yourself time to cool down."],
    },
    EmotionInfo {
        id: "fear",
        emoji: "😨",
        suggestions: &[
            "You are stronger than you think.",
            "Focus on what you can control.",
        ],
    },
    EmotionInfo {
        id: "surprise",
        emoji: "😲",
        suggestions: &["Be open to unexpected things.", "Embrace the new!"],
    },
    EmotionInfo {
        id: "love",
        emoji: "❤️",
        suggestions: &["Cherish the people around you.", "Express your care openly."],
    },
    EmotionInfo {
        id: "neutral",
        emoji: "😐",
        suggestions: &[],
    },
];

/// Resolve a face class index to its emotion name, or `"unknown"`
pub fn face_label(index: i64) -> &'static str {
    FACE_LABELS
        .iter()
        .find(|(i, _)| *i == index)
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_LABEL)
}

/// Whether a face class index is in the label map
pub fn is_known_face_class(index: i64) -> bool {
    FACE_LABELS.iter().any(|(i, _)| *i == index)
}

pub fn emotion_info(label: &str) -> Option<&'static EmotionInfo> {
    EMOTIONS.iter().find(|e| e.id == label)
}

pub fn emoji_for(label: &str) -> Option<&'static str> {
    emotion_info(label).map(|e| e.emoji)
}

/// Suggestion tips for an emotion; empty for emotions without tips
pub fn suggestions_for(label: &str) -> &'static [&'static str] {
    emotion_info(label).map(|e| e.suggestions).unwrap_or(&[])
}
