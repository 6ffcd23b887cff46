//! Card grids for list-shaped profile data.
//!
//! [`CardGrid::build`] is the pure step: it turns the state of one resource
//! into skeletons, an empty message or a list of cards. Drawing is separate
//! and keeps no state between frames.

use crate::theme::SynthBruteTheme;
use crate::traits::Widget;
use crate::widgets::card::{CardWidget, SkeletonCard};
use portal_core::{PatentRecord, ProjectRecord, ResourceState, DESCRIPTION_PLACEHOLDER};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Placeholder cards shown while a list loads.
pub const SKELETON_COUNT: usize = 6;
pub const GRID_COLUMNS: usize = 3;
pub const CARD_HEIGHT: u16 = 6;
/// Border rows only; the skeleton title sits in the top one.
const MIN_SKELETON_HEIGHT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Projects,
    Patents,
    Courses,
    ResearchInterests,
}

impl CardKind {
    /// Plural noun used in the empty message.
    pub fn noun(&self) -> &'static str {
        match self {
            CardKind::Projects => "projects",
            CardKind::Patents => "patents",
            CardKind::Courses => "courses",
            CardKind::ResearchInterests => "research interests",
        }
    }

    pub fn empty_message(&self) -> String {
        format!("No {} found.", self.noun())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardModel {
    pub title: String,
    pub description: String,
}

impl CardModel {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Card for a bare name (a course or a research interest).
    pub fn named(name: &str) -> Self {
        Self::new(name, DESCRIPTION_PLACEHOLDER)
    }
}

impl From<&ProjectRecord> for CardModel {
    fn from(project: &ProjectRecord) -> Self {
        Self::new(project.title.clone(), project.display_description())
    }
}

impl From<&PatentRecord> for CardModel {
    fn from(patent: &PatentRecord) -> Self {
        Self::new(patent.title.clone(), patent.display_description())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardGrid {
    Skeletons(usize),
    Empty(String),
    Cards(Vec<CardModel>),
}

impl CardGrid {
    /// A failed fetch renders like an empty list.
    pub fn build(kind: CardKind, state: &ResourceState<Vec<CardModel>>) -> Self {
        match state {
            ResourceState::Loading => CardGrid::Skeletons(SKELETON_COUNT),
            ResourceState::Ready(cards) if !cards.is_empty() => CardGrid::Cards(cards.clone()),
            ResourceState::Ready(_) | ResourceState::Failed(_) => {
                CardGrid::Empty(kind.empty_message())
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CardGrid::Cards(cards) => cards.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn card(&self, index: usize) -> Option<&CardModel> {
        match self {
            CardGrid::Cards(cards) => cards.get(index),
            _ => None,
        }
    }

    pub fn render(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        selected: Option<usize>,
        theme: &SynthBruteTheme,
    ) {
        match self {
            CardGrid::Empty(message) => {
                let paragraph = Paragraph::new(message.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(theme.text_dim))
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(paragraph, area);
            }
            CardGrid::Skeletons(count) => {
                let skeleton = SkeletonCard { theme };
                for (_, cell) in skeleton_cells(area, *count) {
                    skeleton.render(f, cell);
                }
            }
            CardGrid::Cards(cards) => {
                let selected_row = selected.unwrap_or(0) / GRID_COLUMNS;
                let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
                let first_row = (selected_row + 1).saturating_sub(visible_rows);
                for (index, cell) in grid_cells(area, cards.len(), first_row) {
                    let widget = CardWidget {
                        card: &cards[index],
                        selected: selected == Some(index),
                        theme,
                    };
                    widget.render(f, cell);
                }
            }
        }
    }
}

/// Cell of every item that fits in `area`, starting at `first_row`.
pub fn grid_cells(area: Rect, count: usize, first_row: usize) -> Vec<(usize, Rect)> {
    layout_cells(area, count, first_row, CARD_HEIGHT)
}

/// Cells for `count` skeletons. Rows shrink to share short areas so every
/// skeleton stays visible down to two rows each.
pub fn skeleton_cells(area: Rect, count: usize) -> Vec<(usize, Rect)> {
    let rows = count.div_ceil(GRID_COLUMNS).max(1);
    let share = u16::try_from(usize::from(area.height) / rows).unwrap_or(CARD_HEIGHT);
    let height = share.clamp(MIN_SKELETON_HEIGHT, CARD_HEIGHT);
    layout_cells(area, count, 0, height)
}

fn layout_cells(area: Rect, count: usize, first_row: usize, height: u16) -> Vec<(usize, Rect)> {
    let width = area.width / GRID_COLUMNS as u16;
    let mut cells = Vec::new();
    if width == 0 || area.height < height {
        return cells;
    }
    for index in (first_row * GRID_COLUMNS)..count {
        let row = index / GRID_COLUMNS - first_row;
        let column = index % GRID_COLUMNS;
        let y = area.y + row as u16 * height;
        if y + height > area.y + area.height {
            break;
        }
        cells.push((
            index,
            Rect::new(area.x + column as u16 * width, y, width, height),
        ));
    }
    cells
}

/// Move a grid selection by `delta` cards, clamped to the list.
pub fn move_selection(selected: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = selected as isize + delta;
    target.clamp(0, len as isize - 1) as usize
}
