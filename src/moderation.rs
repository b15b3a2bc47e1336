//! Rule-based chat moderation.
//!
//! Classifies a marketplace chat message as safe, abusive, spam, or
//! phone-sharing, with byte-offset spans for every rule hit. Entirely
//! deterministic; no external calls.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

const ABUSIVE_WORDS: &[&str] = &[
    "idiot",
    "stupid",
    "nonsense",
    "fool",
    "dumb",
    "shut up",
    "bloody",
    "moron",
    "bastard",
    "jerk",
    "trash",
    "loser",
    "scam",
    "fraudster",
    "screw you",
    "kill yourself",
];

const SPAM_HINTS: &[&str] = &[
    "http",
    "www",
    "bit.ly",
    "tinyurl",
    "offer",
    "free",
    "limited time",
    "click here",
    "earn money",
    "guaranteed",
    "promo",
    "discount code",
    "subscribe",
    "join now",
    "invest now",
];

/// Punctuation that counts as shouting when repeated four or more times.
const REPEATED_PUNCT_CHARS: &[u8] = b"!$#%*?~";

/// Spam is flagged when digit runs add up to at least this many digits,
/// so a single price quote never trips the rule.
const SPAM_DIGIT_THRESHOLD: usize = 15;

lazy_static! {
    // Indian mobile formats: +91 98765 43210, 98765-43210, (987) 654-3210
    static ref PHONE_REGEXES: [Regex; 2] = [
        Regex::new(r"(?:\+?91[-\s]*)?[6-9]\d{4}[-\s]*\d{5}").unwrap(),
        Regex::new(r"(?:\+?91[-\s]*)?\(?[6-9]\d{2}\)?[-\s]*\d{3}[-\s]*\d{4}").unwrap(),
    ];
    static ref DIGIT_RUN_RE: Regex = Regex::new(r"\d{5,}").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationLabel {
    Safe,
    Abusive,
    Spam,
    ContainsPhone,
}

impl ModerationLabel {
    /// Wire/metrics form of the label, identical to its JSON encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Abusive => "abusive",
            Self::Spam => "spam",
            Self::ContainsPhone => "contains_phone",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    Phone,
    Abusive,
    SpamHint,
    Digits,
    RepeatedPunct,
}

/// One rule hit. `start`/`end` are byte offsets into the original
/// message; `text` is the matched slice with its original casing.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSpan {
    #[serde(rename = "type")]
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    #[serde(rename = "match")]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModerationResult {
    pub label: ModerationLabel,
    pub reasons: Vec<String>,
    pub spans: Vec<MatchSpan>,
}

/// Classify one chat message.
///
/// Label priority: abusive > spam > contains_phone > safe. Spam requires
/// a marketing cue or heavy digit volume; digit and punctuation spans are
/// only reported when the message actually crosses that bar.
pub fn moderate(message: &str) -> ModerationResult {
    let mut reasons: Vec<String> = Vec::new();
    let mut spans: Vec<MatchSpan> = Vec::new();

    let phone_spans = find_phone_spans(message);
    let has_phone = !phone_spans.is_empty();
    if has_phone {
        spans.extend(phone_spans);
        reasons.push("contains a phone number".to_string());
    }

    let abuse_spans = find_word_spans(message, ABUSIVE_WORDS, SpanKind::Abusive);
    let has_abuse = !abuse_spans.is_empty();
    if has_abuse {
        spans.extend(abuse_spans);
        reasons.push("contains abusive language".to_string());
    }

    let spam_spans = find_spam_spans(message);
    let has_marketing_cue = spam_spans.iter().any(|s| s.kind == SpanKind::SpamHint);
    let digit_total: usize = spam_spans
        .iter()
        .filter(|s| s.kind == SpanKind::Digits)
        .map(|s| s.text.len())
        .sum();
    let is_spam = has_marketing_cue || digit_total >= SPAM_DIGIT_THRESHOLD;
    if is_spam {
        spans.extend(spam_spans);
        reasons.push("spam-like content".to_string());
    }

    let label = if has_abuse {
        ModerationLabel::Abusive
    } else if is_spam {
        ModerationLabel::Spam
    } else if has_phone {
        ModerationLabel::ContainsPhone
    } else {
        if reasons.is_empty() {
            reasons.push("no policy violations detected".to_string());
        }
        ModerationLabel::Safe
    };

    ModerationResult {
        label,
        reasons,
        spans,
    }
}

fn find_phone_spans(text: &str) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    for regex in PHONE_REGEXES.iter() {
        for m in regex.find_iter(text) {
            spans.push(MatchSpan {
                kind: SpanKind::Phone,
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
            });
        }
    }
    spans
}

/// Non-overlapping, ASCII-case-insensitive occurrences of each word.
/// The ASCII lowercase mapping preserves byte offsets, so spans index
/// straight into the original message.
fn find_word_spans(text: &str, words: &[&str], kind: SpanKind) -> Vec<MatchSpan> {
    let lowered = text.to_ascii_lowercase();
    let mut spans = Vec::new();
    for word in words {
        let mut from = 0;
        while let Some(pos) = lowered[from..].find(word) {
            let start = from + pos;
            let end = start + word.len();
            spans.push(MatchSpan {
                kind,
                start,
                end,
                text: text[start..end].to_string(),
            });
            from = end;
        }
    }
    spans
}

fn find_spam_spans(text: &str) -> Vec<MatchSpan> {
    let mut spans = find_word_spans(text, SPAM_HINTS, SpanKind::SpamHint);

    for m in DIGIT_RUN_RE.find_iter(text) {
        spans.push(MatchSpan {
            kind: SpanKind::Digits,
            start: m.start(),
            end: m.end(),
            text: m.as_str().to_string(),
        });
    }

    spans.extend(find_repeated_punct(text));
    spans
}

/// Runs of four or more of the same punctuation character ("!!!!","$$$$").
fn find_repeated_punct(text: &str) -> Vec<MatchSpan> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if REPEATED_PUNCT_CHARS.contains(&bytes[i]) {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j] == bytes[i] {
                j += 1;
            }
            if j - i >= 4 {
                spans.push(MatchSpan {
                    kind: SpanKind::RepeatedPunct,
                    start: i,
                    end: j,
                    text: text[i..j].to_string(),
                });
            }
            i = j;
        } else {
            i += 1;
        }
    }
    spans
}
