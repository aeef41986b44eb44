use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    /// Position in the terminals file, starting at 0.
    pub id: usize,
    pub position: Point,
    /// Charge percentage, nominally 0..=100.
    pub battery: f64,
    pub covered: bool,
}

/// Cost attached to a candidate tree.
///
/// The dump carries no costs, so every tree starts with a structural
/// placeholder; a `DEBUG OBJ` line in the transcript upgrades it to the
/// solver's reported figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeCost {
    Placeholder(f64),
    Reported(f64),
}

impl TreeCost {
    pub fn placeholder_for(id: usize) -> Self {
        Self::Placeholder(100_000.0 + id as f64 * 10_000.0)
    }

    pub fn reported(&self) -> Option<f64> {
        match self {
            Self::Reported(v) => Some(*v),
            Self::Placeholder(_) => None,
        }
    }
}

/// A Full Steiner Tree candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTree {
    pub id: usize,
    /// Member terminal ids in encounter order.
    pub terminals: Vec<usize>,
    /// Number of Steiner points the tree is believed to have. For dump
    /// entries this is inferred from arity and has no position behind it.
    pub steiner_count: usize,
    /// Realized Steiner point, known only from the solution transcript.
    pub steiner_point: Option<Point>,
    pub selected: bool,
    pub cost: TreeCost,
}

impl CandidateTree {
    pub fn kind_label(&self) -> &'static str {
        if self.steiner_count > 0 {
            "Y-junction"
        } else {
            "Direct"
        }
    }
}

/// Per-terminal "uncovered-ness" read from the transcript, last write wins.
pub type CoverageMap = BTreeMap<usize, f64>;

/// Relative distance between the incumbent and the best bound.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OptimalityGap {
    Available(f64),
    #[default]
    Unavailable,
}

impl fmt::Display for OptimalityGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(g) => write!(f, "{:.4}% ({:.6})", g * 100.0, g),
            Self::Unavailable => write!(f, "Not available"),
        }
    }
}

/// How a selected tree is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    /// One segment from the Steiner point to every member terminal.
    Junction(Point),
    /// Consecutive segments between successive terminals in list order.
    /// This only approximates the tree; the true topology is unknown.
    Chain,
}

/// The geometry a selected tree is rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct Realization {
    pub tree_id: usize,
    pub terminals: Vec<usize>,
    pub mode: DrawMode,
}

impl Realization {
    /// Number of line segments this tree contributes to the diagram.
    pub fn segment_count(&self) -> usize {
        match self.mode {
            DrawMode::Junction(_) => self.terminals.len(),
            DrawMode::Chain => self.terminals.len().saturating_sub(1),
        }
    }
}
