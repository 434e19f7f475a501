use serde::{Deserialize, Serialize};

use super::StepKind;

/// A position on the page, in inches. Y grows upwards, as on a Visio page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a box, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Depth of a node in the feature hierarchy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Feature,
    Scenario,
    Step,
}

/// Visual class of a node; decides the fill color of its shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    Feature,
    Scenario,
    Given,
    When,
    Then,
    Other,
}

impl StyleClass {
    pub fn for_step(kind: StepKind) -> Self {
        match kind {
            StepKind::Given => Self::Given,
            StepKind::When => Self::When,
            StepKind::Then => Self::Then,
            StepKind::And => Self::Other,
        }
    }

    /// Index into the document color table.
    pub fn color_index(&self) -> u32 {
        match self {
            Self::Feature => 8,
            Self::Scenario => 9,
            Self::Other => 10,
            Self::Given => 11,
            Self::When => 12,
            Self::Then => 13,
        }
    }
}

/// Which element of the feature tree a layout node stands for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeSource {
    Feature,
    Scenario { scenario: usize },
    Step { scenario: usize, step: usize },
}

/// A node of the feature tree with its computed position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: u32,
    /// The node this one hangs from. Steps chain from the previous step,
    /// the first step of a scenario from the scenario itself.
    pub parent: Option<u32>,
    pub source: NodeSource,
    pub tier: Tier,
    pub center: Point,
    pub size: Size,
    pub style: StyleClass,
}

impl LayoutNode {
    pub fn left(&self) -> f64 {
        self.center.x - self.size.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.size.width / 2.0
    }
}

/// Hands out sheet ids for a single build.
///
/// Shapes and connectors share one id space on a page, so the geometry stage
/// continues numbering where the layout stage stopped.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_after(last: u32) -> Self {
        Self { next: last + 1 }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
