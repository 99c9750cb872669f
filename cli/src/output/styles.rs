//! Console stylesheet built on owo-colors.

use owo_colors::Style;

use crate::domain::CountCell;

/// Colors for every kind of console text. `Default` is colorless.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Keys, unfetched counts and other secondary text.
    pub dim: Style,
    /// Table headers.
    pub bold: Style,
    pub header: Style,
    /// The shown peer in a tab strip.
    pub active: Style,
    /// Empty association counts, rendered as "+ add".
    pub affordance: Style,
}

impl Styles {
    /// Switch to the colored stylesheet.
    pub fn colorize(&mut self) {
        *self = Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            info: Style::new().blue(),
            dim: Style::new().dimmed(),
            bold: Style::new().bold(),
            header: Style::new().bold().cyan(),
            active: Style::new().bold().reversed(),
            affordance: Style::new().underline().cyan(),
        };
    }

    /// Style of a summary count cell; counted cells stay plain.
    #[must_use]
    pub fn count(&self, cell: &CountCell) -> Option<Style> {
        match cell {
            CountCell::NotFetched => Some(self.dim),
            CountCell::Empty => Some(self.affordance),
            CountCell::Counted { .. } => None,
        }
    }
}
