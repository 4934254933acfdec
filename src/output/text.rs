//! Human-readable result messages.

use yansi::Paint;

use crate::ops::Outcome;

/// Text formatter for an [`Outcome`].
pub struct TextOutput<'a> {
    outcome: &'a Outcome,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter; `color` enables ANSI styling.
    #[must_use]
    pub fn new(outcome: &'a Outcome, color: bool) -> Self {
        Self { outcome, color }
    }

    /// Render the message.
    #[must_use]
    pub fn render(&self) -> String {
        let (headline, detail) = match self.outcome {
            Outcome::Success {
                output_path,
                summary,
            } => (
                format!("Output file saved at {}", output_path.display()),
                Some(summary.to_string()),
            ),
            Outcome::NoDuplicates => ("No duplicate values found.".to_string(), None),
        };

        let headline = match (self.color, self.outcome) {
            (false, _) => headline,
            (true, Outcome::Success { .. }) => headline.green().bold().to_string(),
            (true, Outcome::NoDuplicates) => headline.yellow().to_string(),
        };

        match detail {
            Some(detail) => format!("{headline}\n{detail}"),
            None => headline,
        }
    }
}
