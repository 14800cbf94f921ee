//! Scene grouping: merge sentences into duration-bounded scenes.
//!
//! # Algorithm
//!
//! Greedy, single forward pass:
//!
//! 1. Open a group at the first sentence.
//! 2. For each following sentence, measure the group as if extended to it
//!    (`sentence.end - group.start`).
//! 3. Below `max_duration`: extend.
//! 4. At or above `max_duration` while the group is still shorter than
//!    `min_duration`: extend anyway. The floor wins over the ceiling.
//! 5. Otherwise close the group and open a new one at this sentence.
//! 6. The last open group is always emitted, whatever its length.

use talereel_common::error::{TalereelError, TalereelResult};
use talereel_project_model::scene::{SceneDraft, Sentence};

/// Duration bounds for scene grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingConfig {
    /// Ceiling: a group is not extended past this unless it is below the floor.
    pub max_duration: f64,
    /// Floor: a group shorter than this is never closed early.
    pub min_duration: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_duration: 18.0,
            min_duration: 5.0,
        }
    }
}

impl GroupingConfig {
    pub fn new(min_duration: f64, max_duration: f64) -> TalereelResult<Self> {
        if min_duration.is_nan() || max_duration.is_nan() || min_duration >= max_duration {
            return Err(TalereelError::config(format!(
                "min_duration ({min_duration}) must be below max_duration ({max_duration})"
            )));
        }
        Ok(Self {
            max_duration,
            min_duration,
        })
    }
}

/// Group sentences into scene drafts. Pure; same input gives same output.
pub fn group_sentences(sentences: &[Sentence], config: &GroupingConfig) -> Vec<SceneDraft> {
    let Some((first, rest)) = sentences.split_first() else {
        return vec![];
    };

    let mut groups = vec![];
    let mut current = OpenGroup::start(first);

    for sentence in rest {
        let candidate = sentence.end - current.start;
        if candidate < config.max_duration || current.duration() < config.min_duration {
            current.extend(sentence);
        } else {
            groups.push(current.close());
            current = OpenGroup::start(sentence);
        }
    }
    groups.push(current.close());

    tracing::debug!(
        sentences = sentences.len(),
        scenes = groups.len(),
        min = config.min_duration,
        max = config.max_duration,
        "Grouped sentences into scenes"
    );
    groups
}

#[derive(Debug)]
struct OpenGroup<'a> {
    start: f64,
    end: f64,
    texts: Vec<&'a str>,
}

impl<'a> OpenGroup<'a> {
    fn start(sentence: &'a Sentence) -> Self {
        Self {
            start: sentence.start,
            end: sentence.end,
            texts: vec![sentence.text.as_str()],
        }
    }

    fn duration(&self) -> f64 {
        self.end - self.start
    }

    fn extend(&mut self, sentence: &'a Sentence) {
        self.end = sentence.end;
        self.texts.push(sentence.text.as_str());
    }

    fn close(self) -> SceneDraft {
        SceneDraft {
            text: self.texts.join(" "),
            start: self.start,
            end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str, start: f64, end: f64) -> Sentence {
        Sentence::new(text, start, end)
    }

    fn config(min: f64, max: f64) -> GroupingConfig {
        GroupingConfig::new(min, max).unwrap()
    }

    #[test]
    fn test_merges_while_under_max() {
        let sentences = vec![s("a sentence.", 0.0, 2.5), s("Another one.", 3.0, 5.0)];
        let scenes = group_sentences(&sentences, &config(1.0, 10.0));
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].text, "a sentence. Another one.");
        assert_eq!(scenes[0].start, 0.0);
        assert_eq!(scenes[0].end, 5.0);
    }

    #[test]
    fn test_closes_at_max_once_floor_reached() {
        let sentences = vec![
            s("One.", 0.0, 6.0),
            s("Two.", 6.0, 12.0),
            s("Three.", 12.0, 17.0),
        ];
        let scenes = group_sentences(&sentences, &config(5.0, 10.0));
        assert_eq!(scenes.len(), 3);
        assert_eq!(scenes[1].text, "Two.");
        assert_eq!((scenes[2].start, scenes[2].end), (12.0, 17.0));
    }

    #[test]
    fn test_candidate_equal_to_max_closes() {
        let sentences = vec![s("One.", 0.0, 6.0), s("Two.", 7.0, 10.0)];
        let scenes = group_sentences(&sentences, &config(5.0, 10.0));
        assert_eq!(scenes.len(), 2);
    }

    #[test]
    fn test_floor_beats_ceiling() {
        // First sentence is 2s; adding the next makes 20s > max, but the
        // group is under the floor so it is force-extended.
        let sentences = vec![s("Short.", 0.0, 2.0), s("Very long sentence.", 2.0, 20.0)];
        let scenes = group_sentences(&sentences, &config(5.0, 10.0));
        assert_eq!(scenes.len(), 1);
        assert_eq!(scenes[0].end, 20.0);
    }

    #[test]
    fn test_last_group_emitted_regardless_of_length() {
        let sentences = vec![s("Long.", 0.0, 8.0), s("Tiny.", 9.5, 10.5)];
        let scenes = group_sentences(&sentences, &config(5.0, 10.0));
        assert_eq!(scenes.len(), 2);
        assert!(scenes[1].duration() < 5.0);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(group_sentences(&[], &GroupingConfig::default()).is_empty());
        let one = group_sentences(&[s("Only.", 1.0, 40.0)], &GroupingConfig::default());
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].text, "Only.");
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        assert!(GroupingConfig::new(10.0, 5.0).is_err());
        assert!(GroupingConfig::new(5.0, 5.0).is_err());
    }
}
