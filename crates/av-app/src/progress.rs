#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingCase,
    PreparingScript,
    BuildingGeometry,
    TemplatingScript,
    RunningSolver,
    ParsingResults,
    Comparing,
    SavingReport,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingCase => "Loading case",
            RunStage::PreparingScript => "Preparing control script",
            RunStage::BuildingGeometry => "Building geometry",
            RunStage::TemplatingScript => "Templating script",
            RunStage::RunningSolver => "Running solver",
            RunStage::ParsingResults => "Parsing results",
            RunStage::Comparing => "Comparing",
            RunStage::SavingReport => "Saving report",
            RunStage::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    /// Zero-based iteration index for per-iteration stages.
    pub iteration: Option<usize>,
    pub iterations: usize,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, iterations: usize, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            iteration: None,
            iterations,
            elapsed_wall_s,
            message,
        }
    }

    pub fn for_iteration(mut self, index: usize) -> Self {
        self.iteration = Some(index);
        self
    }
}
