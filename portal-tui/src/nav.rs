//! Tab navigation for the profile dashboard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProfileTab {
    #[default]
    Overview,
    Projects,
    Patents,
    Research,
    Courses,
    Links,
}

impl ProfileTab {
    pub fn title(&self) -> &'static str {
        match self {
            ProfileTab::Overview => "Overview",
            ProfileTab::Projects => "Projects",
            ProfileTab::Patents => "Patents",
            ProfileTab::Research => "Research",
            ProfileTab::Courses => "Courses",
            ProfileTab::Links => "Links",
        }
    }

    pub fn all() -> &'static [ProfileTab] {
        &[
            ProfileTab::Overview,
            ProfileTab::Projects,
            ProfileTab::Patents,
            ProfileTab::Research,
            ProfileTab::Courses,
            ProfileTab::Links,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<ProfileTab> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> ProfileTab {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> ProfileTab {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
