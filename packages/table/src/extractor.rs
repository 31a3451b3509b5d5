//! The column extraction state machine.
//!
//! Walks reconstructed lines in order. A line matching the trigger rule
//! opens a table and locks the x-position of the token holding the trigger
//! key. Until a stop line closes the table, every token within
//! [`COLUMN_ALIGN_TOLERANCE`] of that x is emitted as a column value.

use holdings_extract_layout_models::Line;
use holdings_extract_table_models::TableConfig;

use crate::matcher::is_match;

/// Tokens strictly within this x distance of the header are in the target
/// column.
pub const COLUMN_ALIGN_TOLERANCE: f64 = 5.0;

/// Where the extractor is in the current table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ExtractionState {
    /// Outside any table.
    #[default]
    Idle,
    /// Inside a table whose target column sits at `header_x`.
    Extracting {
        /// x-position of the header key token.
        header_x: f64,
    },
}

impl ExtractionState {
    /// Whether a table is open.
    #[must_use]
    pub const fn is_extracting(&self) -> bool {
        matches!(self, Self::Extracting { .. })
    }

    /// The locked column x, if a table is open.
    #[must_use]
    pub const fn header_x(&self) -> Option<f64> {
        match self {
            Self::Idle => None,
            Self::Extracting { header_x } => Some(*header_x),
        }
    }
}

/// What a single line did to the extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineEvent {
    /// The line matched the trigger while a table was already open.
    RepeatedHeader,
    /// The line opened a table anchored at `header_x`.
    TableOpened {
        /// x-position of the key token.
        header_x: f64,
    },
    /// The line matched the trigger but no token contained the key.
    HeaderKeyNotLocatable,
    /// The line matched the stop rule and closed the open table.
    TableClosed,
    /// The line was inside a table and contributed `count` values.
    Values {
        /// Number of aligned tokens emitted.
        count: usize,
    },
    /// The line was outside any table and matched nothing.
    Skipped,
}

/// Per-document extraction state plus counters for the run summary.
#[derive(Debug, Clone)]
pub struct ColumnExtractor<'a> {
    config: &'a TableConfig,
    state: ExtractionState,
    tables_opened: u32,
    inert_triggers: u32,
}

impl<'a> ColumnExtractor<'a> {
    /// Creates an idle extractor for `config`.
    #[must_use]
    pub const fn new(config: &'a TableConfig) -> Self {
        Self {
            config,
            state: ExtractionState::Idle,
            tables_opened: 0,
            inert_triggers: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ExtractionState {
        self.state
    }

    /// Number of tables opened so far.
    #[must_use]
    pub const fn tables_opened(&self) -> u32 {
        self.tables_opened
    }

    /// Number of trigger lines that had no token containing the key.
    #[must_use]
    pub const fn inert_triggers(&self) -> u32 {
        self.inert_triggers
    }

    /// Closes any open table without a stop line.
    pub fn reset(&mut self) {
        self.state = ExtractionState::Idle;
    }

    /// Applies one line, appending any column values to `out`.
    pub fn process_line(&mut self, line: &Line, out: &mut Vec<String>) -> LineEvent {
        let line_text = line.text();
        let trigger_match = is_match(&line_text, &self.config.trigger.rule);
        let stop_match = is_match(&line_text, &self.config.stop);

        log::trace!("y={:.2} {line_text}", line.y);

        if trigger_match {
            if self.state.is_extracting() {
                return LineEvent::RepeatedHeader;
            }

            let key = self.config.trigger.key.as_str();
            return match line.tokens.iter().find(|t| t.text.contains(key)) {
                Some(token) => {
                    self.state = ExtractionState::Extracting { header_x: token.x };
                    self.tables_opened += 1;
                    log::debug!("Table opened at y={:.2}, column x={:.2}", line.y, token.x);
                    LineEvent::TableOpened { header_x: token.x }
                }
                None => {
                    self.inert_triggers += 1;
                    log::warn!(
                        "Trigger matched \"{line_text}\" but no token contains key \"{key}\"; \
                         not starting a table"
                    );
                    LineEvent::HeaderKeyNotLocatable
                }
            };
        }

        let ExtractionState::Extracting { header_x } = self.state else {
            return LineEvent::Skipped;
        };

        if stop_match {
            self.state = ExtractionState::Idle;
            log::debug!("Table closed at y={:.2} by \"{line_text}\"", line.y);
            return LineEvent::TableClosed;
        }

        let before = out.len();
        out.extend(
            line.tokens
                .iter()
                .filter(|t| (t.x - header_x).abs() < COLUMN_ALIGN_TOLERANCE)
                .map(|t| t.text.clone()),
        );

        LineEvent::Values {
            count: out.len() - before,
        }
    }

    /// Applies every line of one page in order, returning the page's
    /// column values.
    pub fn process_page(&mut self, lines: &[Line]) -> Vec<String> {
        let mut values = Vec::new();
        for line in lines {
            self.process_line(line, &mut values);
        }
        values
    }
}
