use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum GoalCategory {
    Travel,
    Home,
    Education,
    Family,
    Freedom,
    #[default]
    Lifestyle,
    Health,
}

impl GoalCategory {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Travel => "travel",
            Self::Home => "home",
            Self::Education => "education",
            Self::Family => "family",
            Self::Freedom => "freedom",
            Self::Lifestyle => "lifestyle",
            Self::Health => "health",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "travel" => Some(Self::Travel),
            "home" => Some(Self::Home),
            "education" => Some(Self::Education),
            "family" => Some(Self::Family),
            "freedom" => Some(Self::Freedom),
            "lifestyle" => Some(Self::Lifestyle),
            "health" => Some(Self::Health),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [GoalCategory] {
        &[
            Self::Travel,
            Self::Home,
            Self::Education,
            Self::Family,
            Self::Freedom,
            Self::Lifestyle,
            Self::Health,
        ]
    }

    /// Comma-separated list of category names, for usage messages.
    pub(crate) fn names() -> String {
        Self::all()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
