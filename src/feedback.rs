use clap::ValueEnum;

/// How much feedback the user asked for. Picks both the prompt template and the output budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FeedbackSize {
    #[default]
    Concise,
    Detailed,
    Comprehensive,
}

impl FeedbackSize {
    pub const ALL: [FeedbackSize; 3] = [
        FeedbackSize::Concise,
        FeedbackSize::Detailed,
        FeedbackSize::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSize::Concise => "concise",
            FeedbackSize::Detailed => "detailed",
            FeedbackSize::Comprehensive => "comprehensive",
        }
    }

    /// Human label shown next to the progress bar.
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackSize::Concise => "Quick Review",
            FeedbackSize::Detailed => "Detailed Analysis",
            FeedbackSize::Comprehensive => "Deep Dive",
        }
    }

    /// Maximum number of output tokens the model is configured with.
    pub fn token_limit(&self) -> u32 {
        match self {
            FeedbackSize::Concise => 500,
            FeedbackSize::Detailed => 2000,
            FeedbackSize::Comprehensive => 10000,
        }
    }
}

/// Which kind of GitHub object is being reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisType {
    #[default]
    File,
    Commit,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::File => "file",
            AnalysisType::Commit => "commit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_limits_are_positive_and_grow_with_size() {
        let limits: Vec<u32> = FeedbackSize::ALL.iter().map(|s| s.token_limit()).collect();
        assert!(limits.iter().all(|l| *l > 0));
        assert!(limits.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn defaults_match_the_quick_file_review() {
        assert_eq!(FeedbackSize::default(), FeedbackSize::Concise);
        assert_eq!(AnalysisType::default(), AnalysisType::File);
        assert_eq!(FeedbackSize::default().label(), "Quick Review");
    }
}
