/// Which estimate the caller asked for. Only the instruction sent to the
/// model differs between kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateKind {
    Build,
    Repair,
}

impl EstimateKind {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Build => "Analyze this furniture image and estimate the build cost",
            Self::Repair => {
                "Analyze this furniture image and estimate the repair cost and required work"
            }
        }
    }

    /// Label used in diagnostics.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Build => "estimate_build",
            Self::Repair => "estimate_repair",
        }
    }
}
