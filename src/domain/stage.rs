use serde::Serialize;

/// A linear progression with one off-track terminal state.
pub trait Progression: Copy + PartialEq + Sized + 'static {
    /// The on-track steps, in order. Never contains the terminal state.
    const ORDER: &'static [Self];
    const TERMINAL: Self;

    fn as_str(&self) -> &'static str;
    fn label(&self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        Self::ORDER
            .iter()
            .copied()
            .chain(std::iter::once(Self::TERMINAL))
            .find(|step| step.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Discovery,
    QuickScan,
    DeepDive,
    Validation,
    MvpBuild,
    Operating,
    Exited,
}

impl Progression for PipelineStage {
    const ORDER: &'static [Self] = &[
        Self::Discovery,
        Self::QuickScan,
        Self::DeepDive,
        Self::Validation,
        Self::MvpBuild,
        Self::Operating,
    ];
    const TERMINAL: Self = Self::Exited;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::QuickScan => "quick_scan",
            Self::DeepDive => "deep_dive",
            Self::Validation => "validation",
            Self::MvpBuild => "mvp_build",
            Self::Operating => "operating",
            Self::Exited => "exited",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Discovery => "Discovery",
            Self::QuickScan => "Quick Scan",
            Self::DeepDive => "Deep Dive",
            Self::Validation => "Validation",
            Self::MvpBuild => "MVP Build",
            Self::Operating => "Operating",
            Self::Exited => "Exited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudioPhase {
    Intake,
    Build,
    Distribute,
    Measure,
    Iterate,
    Scale,
    Killed,
}

impl Progression for StudioPhase {
    const ORDER: &'static [Self] = &[
        Self::Intake,
        Self::Build,
        Self::Distribute,
        Self::Measure,
        Self::Iterate,
        Self::Scale,
    ];
    const TERMINAL: Self = Self::Killed;

    fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "INTAKE",
            Self::Build => "BUILD",
            Self::Distribute => "DISTRIBUTE",
            Self::Measure => "MEASURE",
            Self::Iterate => "ITERATE",
            Self::Scale => "SCALE",
            Self::Killed => "KILLED",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Intake => "Intake",
            Self::Build => "Build",
            Self::Distribute => "Distribute",
            Self::Measure => "Measure",
            Self::Iterate => "Iterate",
            Self::Scale => "Scale",
            Self::Killed => "Killed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Past,
    Current,
    Future,
    /// Shown when the subject left the track; no step is highlighted.
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub key: &'static str,
    pub label: &'static str,
    /// 1-based.
    pub number: usize,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Terminal {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub steps: Vec<Step>,
    /// Set when the current value is the terminal state.
    pub terminal: Option<Terminal>,
}

/// Classify every step of `P::ORDER` against `current`.
///
/// A value that is neither on the track nor terminal leaves every step in
/// the future.
pub fn timeline<P: Progression>(current: &str) -> Timeline {
    let parsed = P::parse(current);
    let terminal = parsed
        .filter(|p| *p == P::TERMINAL)
        .map(|p| Terminal {
            key: p.as_str(),
            label: p.label(),
        });
    let current_index = parsed.and_then(|p| P::ORDER.iter().position(|step| *step == p));

    let steps = P::ORDER
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let state = if terminal.is_some() {
                StepState::Neutral
            } else {
                match current_index {
                    Some(c) if i < c => StepState::Past,
                    Some(c) if i == c => StepState::Current,
                    _ => StepState::Future,
                }
            };
            Step {
                key: step.as_str(),
                label: step.label(),
                number: i + 1,
                state,
            }
        })
        .collect();

    Timeline { steps, terminal }
}
