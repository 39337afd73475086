//! Static reference data: adopter segments and Rogers' determinants.

use crate::color::Rgb;

/// One population slice of the adoption curve
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: &'static str,
    /// Share of the total population (percent)
    pub percent: f64,
    pub color: Rgb,
    pub description: &'static str,
}

/// Direction in which a determinant pushes adoption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Positive,
    Negative,
}

impl Impact {
    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Positive => "+",
            Impact::Negative => "-",
        }
    }

    /// Badge color (green-500 / red-500)
    pub fn color(&self) -> Rgb {
        match self {
            Impact::Positive => Rgb(0x22c55e),
            Impact::Negative => Rgb(0xef4444),
        }
    }
}

/// Qualitative attribute of an innovation, shown for reference only
#[derive(Debug, Clone, PartialEq)]
pub struct Determinant {
    pub name: &'static str,
    pub value: &'static str,
    pub impact: Impact,
    pub description: &'static str,
}

pub const SEGMENTS: [Segment; 5] = [
    Segment {
        name: "Innovators",
        percent: 2.5,
        color: Rgb(0x3b82f6),
        description: "Risk-takers who embrace new ideas first",
    },
    Segment {
        name: "Early Adopters",
        percent: 13.5,
        color: Rgb(0x10b981),
        description: "Opinion leaders who validate innovations",
    },
    Segment {
        name: "Early Majority",
        percent: 34.0,
        color: Rgb(0xf59e0b),
        description: "Deliberate pragmatists who follow proven success",
    },
    Segment {
        name: "Late Majority",
        percent: 34.0,
        color: Rgb(0xef4444),
        description: "Skeptics who adopt under pressure or necessity",
    },
    Segment {
        name: "Laggards",
        percent: 16.0,
        color: Rgb(0x6b7280),
        description: "Traditionalists resistant to change",
    },
];

pub const DETERMINANTS: [Determinant; 5] = [
    Determinant {
        name: "Relative Advantage",
        value: "higher",
        impact: Impact::Positive,
        description: "Clear superiority over existing solutions",
    },
    Determinant {
        name: "Compatibility",
        value: "higher",
        impact: Impact::Positive,
        description: "Fits existing values and practices",
    },
    Determinant {
        name: "Complexity",
        value: "lower",
        impact: Impact::Positive,
        description: "Easy to understand and use",
    },
    Determinant {
        name: "Trialability",
        value: "higher",
        impact: Impact::Positive,
        description: "Can be tested on limited basis",
    },
    Determinant {
        name: "Observability",
        value: "higher",
        impact: Impact::Positive,
        description: "Results are visible to others",
    },
];

/// Sum of all segment shares. Independent of saturation.
pub fn total_share(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.percent).sum()
}
