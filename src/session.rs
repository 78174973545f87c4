//! Per-session UI state: which ranking tab is open and the unsaved visit
//! form. The UI creates one `SessionState` and hands it to the screens that
//! need it; nothing here touches the database except through a `Journal`.

use serde::{Deserialize, Serialize};

use crate::db::Leaderboard;
use crate::dimensions::ExperienceDimension;
use crate::error::Result;
use crate::forms::VisitForm;
use crate::journal::Journal;

/// One leaderboard the ranking screen can show.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RankingTab {
    #[default]
    Overall,
    Dimension(ExperienceDimension),
    Drinks(String),
}

impl RankingTab {
    /// Tabs offered by default, in display order.
    pub fn standard_tabs() -> Vec<RankingTab> {
        let dimensions = [
            ExperienceDimension::CoffeeQuality,
            ExperienceDimension::Vibe,
            ExperienceDimension::InteriorDesign,
            ExperienceDimension::WorkFriendliness,
            ExperienceDimension::Value,
            ExperienceDimension::FoodPastries,
        ];
        let drinks = ["Espresso", "Cappuccino", "Latte", "Flat White", "Matcha Latte"];

        std::iter::once(RankingTab::Overall)
            .chain(dimensions.into_iter().map(RankingTab::Dimension))
            .chain(drinks.into_iter().map(|t| RankingTab::Drinks(t.to_string())))
            .collect()
    }

    /// Tab caption, e.g. "Best Vibe" or "Top Latte".
    pub fn label(&self) -> String {
        match self {
            RankingTab::Overall => "Overall".to_string(),
            RankingTab::Dimension(dimension) => match dimension {
                ExperienceDimension::CoffeeQuality => "Coffee Quality".to_string(),
                ExperienceDimension::Vibe => "Best Vibe".to_string(),
                ExperienceDimension::InteriorDesign => "Best Interior".to_string(),
                ExperienceDimension::WorkFriendliness => "Best for Working".to_string(),
                ExperienceDimension::Value => "Best Value".to_string(),
                ExperienceDimension::FoodPastries => "Best Food".to_string(),
                other => other.label().to_string(),
            },
            RankingTab::Drinks(drink_type) => format!("Top {drink_type}"),
        }
    }

    /// Run the query behind this tab.
    pub fn load(&self, journal: &Journal) -> Result<Leaderboard> {
        Ok(match self {
            RankingTab::Overall => Leaderboard::Cafes(journal.rank_cafes_overall()?),
            RankingTab::Dimension(dimension) => {
                Leaderboard::Cafes(journal.rank_cafes_by_dimension(*dimension)?)
            }
            RankingTab::Drinks(drink_type) => {
                Leaderboard::Drinks(journal.rank_drinks_by_type(drink_type)?)
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub active_ranking_tab: RankingTab,
    /// Survives leaving the add-visit screen; cleared after a save.
    pub visit_form_draft: Option<VisitForm>,
}

impl SessionState {
    pub fn set_active_ranking_tab(&mut self, tab: RankingTab) {
        self.active_ranking_tab = tab;
    }

    /// Load the leaderboard behind the active tab.
    pub fn active_leaderboard(&self, journal: &Journal) -> Result<Leaderboard> {
        self.active_ranking_tab.load(journal)
    }

    pub fn set_visit_form_draft(&mut self, draft: Option<VisitForm>) {
        self.visit_form_draft = draft;
    }

    pub fn clear_visit_form_draft(&mut self) {
        self.visit_form_draft = None;
    }
}
