use std::collections::BTreeSet;

use crate::errors::DraftError;

/// Minimum number of options of a poll.
const MIN_OPTIONS: usize = 2;

/// The request body of `POST /poll/create`.
///
/// The poll service keys options by their label.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct NewPoll {
    pub question: String,
    pub options: Vec<String>,
}

/// An editable poll that has not been submitted yet.
///
/// It always holds at least two option slots, possibly empty ones; emptiness
/// and duplicates are only checked by [`PollDraft::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    question: String,
    options: Vec<String>,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); MIN_OPTIONS],
        }
    }
}

impl PollDraft {
    pub fn new(question: impl ToString) -> Self {
        Self {
            question: question.to_string(),
            ..Default::default()
        }
    }

    /// Build a draft from a question and option labels, padding with empty
    /// slots up to the minimum.
    pub fn with_options<I, S>(question: impl ToString, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut options: Vec<String> =
            options.into_iter().map(|x| x.to_string()).collect();
        while options.len() < MIN_OPTIONS {
            options.push(String::new());
        }

        Self {
            question: question.to_string(),
            options,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn set_question(&mut self, question: impl ToString) {
        self.question = question.to_string();
    }

    /// Append an empty option slot and return its index.
    pub fn add_option(&mut self) -> usize {
        self.options.push(String::new());
        self.options.len() - 1
    }

    /// Set the label of the option at `index`.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn set_option(&mut self, index: usize, label: impl ToString) -> bool {
        let Some(slot) = self.options.get_mut(index) else {
            return false;
        };
        *slot = label.to_string();
        true
    }

    /// Remove the option at `index`.
    ///
    /// Refused, returning `false`, if only the minimum number of options is
    /// left or `index` is out of range.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= MIN_OPTIONS || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    /// Check the draft and build the request body to submit.
    pub fn validate(&self) -> Result<NewPoll, DraftError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(DraftError::EmptyQuestion);
        }

        let mut seen = BTreeSet::new();
        let mut options = Vec::with_capacity(self.options.len());

        for (index, label) in self.options.iter().enumerate() {
            let label = label.trim();
            if label.is_empty() {
                return Err(DraftError::EmptyOption { index });
            }
            if !seen.insert(label) {
                return Err(DraftError::DuplicateOption {
                    label: label.to_string(),
                });
            }
            options.push(label.to_string());
        }

        Ok(NewPoll {
            question: question.to_string(),
            options,
        })
    }
}
