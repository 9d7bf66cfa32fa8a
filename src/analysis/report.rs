use std::fmt::{Display, Error, Formatter};

use super::classify::FormatClassification;
use super::combos::ChannelCombination;

// Run state
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

impl Display for RunState {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let name = match *self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

// Report section
//------------------------------------------------------------------------------

// One combination's worth of report. The lines hold everything below the
// section header, including the rendered dump or an inline error note.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportSection {
    pub combination: ChannelCombination,
    pub payload_len: usize,
    pub classification: Option<FormatClassification>,
    pub lines: Vec<String>,
}

impl Display for ReportSection {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        writeln!(f, "=== Channel {} ===", self.combination)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// Analysis report
//------------------------------------------------------------------------------

// Ordered sections plus the terminal state of the run that produced them.
// Immutable once handed to the caller.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisReport {
    sections: Vec<ReportSection>,
    outcome: RunState,
}

impl AnalysisReport {
    pub(crate) fn new(sections: Vec<ReportSection>, outcome: RunState) -> Self {
        debug_assert!(outcome.is_terminal(), "Report outcome must be terminal: {outcome}");
        Self { sections, outcome }
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn outcome(&self) -> RunState {
        self.outcome
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Display for AnalysisReport {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        writeln!(f, "=== Steganalysis results ===")?;
        writeln!(f)?;
        for section in &self.sections {
            write!(f, "{section}")?;
            writeln!(f)?;
        }
        if self.outcome == RunState::Cancelled {
            writeln!(f, "=== Analysis cancelled ===")?;
        }
        Ok(())
    }
}
