use std::fmt;

use crate::guard::VoteGuard;
use crate::poll::percent_of;
use crate::poll::OptionKey;
use crate::poll::PollSnapshot;
use crate::render::FailurePolicy;
use crate::render::FAILURE_MESSAGE;
use crate::state::ViewState;

/// Number of cells of a full bar in the text rendering.
pub const BAR_WIDTH: usize = 40;

/// The vote button of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteButton {
    /// Clickable only while the guard is `Unvoted`.
    pub enabled: bool,

    /// Marks the option this client voted for.
    pub highlighted: bool,
}

impl VoteButton {
    pub fn label(&self) -> &'static str {
        if self.highlighted {
            "Your vote"
        } else {
            "Vote"
        }
    }
}

/// One option as painted: label, counter, bar and button.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    pub key: OptionKey,
    pub label: String,
    pub votes: u64,

    /// Bar width in percent, 0 to 100 with one decimal.
    pub percent: f64,

    pub button: VoteButton,
}

impl OptionRow {
    /// Number of filled cells of a bar `width` cells wide.
    pub fn filled_cells(&self, width: usize) -> usize {
        let cells = (self.percent / 100.0 * width as f64).round() as usize;
        cells.min(width)
    }
}

/// A loaded poll as painted.
#[derive(Debug, Clone, PartialEq)]
pub struct PollRender {
    pub question: String,
    pub rows: Vec<OptionRow>,
    pub total: u64,
}

impl fmt::Display for PollRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.question)?;

        for row in &self.rows {
            let filled = row.filled_cells(BAR_WIDTH);
            let marker = if row.button.enabled { ' ' } else { '-' };

            writeln!(
                f,
                "  {:<24} {:>6} ({:.1}%)",
                row.label, row.votes, row.percent
            )?;
            writeln!(
                f,
                "  [{}{}] {}[{}] {}",
                "#".repeat(filled),
                " ".repeat(BAR_WIDTH - filled),
                marker,
                row.key,
                row.button.label()
            )?;
        }

        write!(f, "Total votes: {}", self.total)
    }
}

/// What a view shows at one moment.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// No snapshot has been loaded yet.
    Loading,

    /// The most recent fetch failed and the policy is
    /// [`FailurePolicy::ShowMessage`].
    Failed { message: &'static str },

    Poll(PollRender),
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Loading => write!(f, "Loading poll..."),
            Rendered::Failed { message } => write!(f, "{}", message),
            Rendered::Poll(p) => write!(f, "{}", p),
        }
    }
}

/// Paint a snapshot under a vote guard.
pub fn render(snapshot: &PollSnapshot, guard: &VoteGuard) -> PollRender {
    let total = snapshot.total_votes();

    let rows = snapshot
        .options
        .iter()
        .map(|(key, opt)| OptionRow {
            key: key.clone(),
            label: opt.label.clone(),
            votes: opt.votes,
            percent: percent_of(opt.votes, total),
            button: VoteButton {
                enabled: guard.can_vote(),
                highlighted: guard.is_voted_for(key),
            },
        })
        .collect();

    PollRender {
        question: snapshot.question.clone(),
        rows,
        total,
    }
}

/// Paint the whole view state, applying the failure policy.
pub fn render_view(state: &ViewState, policy: FailurePolicy) -> Rendered {
    if policy == FailurePolicy::ShowMessage && state.last_error.is_some() {
        return Rendered::Failed {
            message: FAILURE_MESSAGE,
        };
    }

    match &state.snapshot {
        None => Rendered::Loading,
        Some(snapshot) => Rendered::Poll(render(snapshot, &state.guard)),
    }
}
