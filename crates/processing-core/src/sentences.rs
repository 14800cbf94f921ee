//! Sentence building: group timestamped words at terminal punctuation.
//!
//! Only spoken words take part. Spacing entries and audio events neither
//! extend a sentence nor open or close one.

use talereel_project_model::scene::Sentence;
use talereel_project_model::transcript::Word;

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

/// Whether a word closes a sentence: its last character is terminal
/// punctuation. Trailing whitespace does not count as closed.
pub fn is_sentence_end(word: &Word) -> bool {
    word.text.ends_with(&TERMINAL_PUNCTUATION[..])
}

/// Group spoken words into sentences.
///
/// A trailing run without terminal punctuation is still emitted as the
/// final sentence.
pub fn build_sentences(words: &[Word]) -> Vec<Sentence> {
    let mut sentences = vec![];
    let mut buffer = SentenceBuffer::default();

    for word in words.iter().filter(|w| w.is_spoken()) {
        buffer.push(word);
        if is_sentence_end(word) {
            if let Some(sentence) = buffer.take() {
                sentences.push(sentence);
            }
        }
    }

    if let Some(sentence) = buffer.take() {
        sentences.push(sentence);
    }

    tracing::debug!(
        words = words.len(),
        sentences = sentences.len(),
        "Built sentences"
    );
    sentences
}

/// Running span of words belonging to the current sentence.
#[derive(Debug, Default)]
struct SentenceBuffer {
    parts: Vec<String>,
    start: f64,
    end: f64,
}

impl SentenceBuffer {
    fn push(&mut self, word: &Word) {
        if self.parts.is_empty() {
            self.start = word.start;
        }
        self.parts.push(word.text.clone());
        self.end = word.end;
    }

    fn take(&mut self) -> Option<Sentence> {
        if self.parts.is_empty() {
            return None;
        }
        let text = normalize_whitespace(&self.parts.join(" "));
        self.parts.clear();
        Some(Sentence::new(text, self.start, self.end))
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
