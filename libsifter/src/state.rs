//! The dashboard state and its transition function.
use tracing::{debug, warn};

use crate::dataset::{ColumnKey, ColumnMap, DataSource, Dataset, Record};
use crate::filter::{self, FilterState, SearchState};
use crate::pagination::{PageState, PageView, Paging};

/// Everything that changes the visible data. Applied with [`DashboardState::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    /// Swap in a freshly loaded dataset and reset every per-column state.
    ReplaceDataset(Dataset),
    ToggleFilterValue { column: ColumnKey, value: i64 },
    ClearColumnFilter(ColumnKey),
    ClearAllFilters,
    SetSearch { column: ColumnKey, text: String },
    ToggleDropdown(ColumnKey),
    NextPage,
    PreviousPage,
    ScrollDown,
    ScrollUp,
}

/// Dataset plus all user selections.
///
/// Every `ColumnMap` field has the dataset's column list as its key set. The only way
/// to change the dataset is [`DashboardAction::ReplaceDataset`], which rebuilds them.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    dataset: Dataset,
    filters: FilterState,
    searches: SearchState,
    dropdowns: ColumnMap<bool>,
    page: PageState,
    paging: Paging,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(Dataset::sample(), Paging::default())
    }
}

impl DashboardState {
    #[must_use]
    pub fn new(dataset: Dataset, paging: Paging) -> Self {
        Self {
            filters: FilterState::for_columns(dataset.columns()),
            searches: SearchState::for_columns(dataset.columns()),
            dropdowns: ColumnMap::for_columns(dataset.columns()),
            page: PageState::default(),
            paging,
            dataset,
        }
    }

    /// A state with no columns, used while the real state is moved through `reduce`.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(
            Dataset::new(vec![], vec![], DataSource::Sample),
            Paging::default(),
        )
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    #[must_use]
    pub fn searches(&self) -> &SearchState {
        &self.searches
    }

    #[must_use]
    pub fn page(&self) -> PageState {
        self.page
    }

    #[must_use]
    pub fn paging(&self) -> Paging {
        self.paging
    }

    #[must_use]
    pub fn is_dropdown_open(&self, column: &ColumnKey) -> bool {
        self.dropdowns.get(column).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn search_text(&self, column: &ColumnKey) -> &str {
        self.searches.get(column).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_selected(&self, column: &ColumnKey, value: i64) -> bool {
        self.filters
            .get(column)
            .is_some_and(|selected| selected.contains(&value))
    }

    #[must_use]
    pub fn filtered_rows(&self) -> Vec<&Record> {
        filter::apply_filters(&self.dataset, &self.filters)
    }

    #[must_use]
    pub fn offered_values(&self, column: &ColumnKey) -> Vec<i64> {
        filter::offered_values(&self.dataset, &self.filters, &self.searches, column)
    }

    #[must_use]
    pub fn filter_summary(&self) -> Option<String> {
        filter::describe_filters(&self.filters)
    }

    #[must_use]
    pub fn page_view(&self) -> PageView {
        self.paging.view(self.page, self.filtered_rows().len())
    }

    /// Applies one action and returns the resulting state.
    #[must_use]
    pub fn reduce(self, action: DashboardAction) -> Self {
        match action {
            DashboardAction::ReplaceDataset(dataset) => Self::new(dataset, self.paging),
            DashboardAction::ToggleFilterValue { column, value } => {
                self.toggle_filter_value(&column, value)
            }
            DashboardAction::ClearColumnFilter(column) => self.update_filter(&column, |selected| {
                selected.clear();
            }),
            DashboardAction::ClearAllFilters => {
                let mut next = self;
                next.filters.values_mut().for_each(|selected| selected.clear());
                next.page = PageState::default();
                next
            }
            DashboardAction::SetSearch { column, text } => {
                let mut next = self;
                match next.searches.get_mut(&column) {
                    Some(search) => *search = text,
                    None => warn!("Ignoring search for unknown column '{column}'"),
                }
                next
            }
            DashboardAction::ToggleDropdown(column) => {
                let mut next = self;
                match next.dropdowns.get_mut(&column) {
                    Some(open) => *open = !*open,
                    None => warn!("Ignoring dropdown toggle for unknown column '{column}'"),
                }
                next
            }
            DashboardAction::NextPage => self.navigate(Paging::next_page),
            DashboardAction::PreviousPage => self.navigate(Paging::previous_page),
            DashboardAction::ScrollDown => self.navigate(Paging::scroll_down),
            DashboardAction::ScrollUp => self.navigate(Paging::scroll_up),
        }
    }

    fn toggle_filter_value(self, column: &ColumnKey, value: i64) -> Self {
        let Some(index) = self.dataset.column_index(column) else {
            warn!("Ignoring filter toggle for unknown column '{column}'");
            return self;
        };
        if !self.is_selected(column, value)
            && !self.dataset.records().iter().any(|r| r.value(index) == value)
        {
            warn!("Ignoring filter value {value}, it does not occur in column '{column}'");
            return self;
        }
        self.update_filter(column, |selected| {
            if !selected.remove(&value) {
                selected.insert(value);
            }
        })
    }

    /// Edits one column's selection and resets pagination.
    fn update_filter(
        mut self,
        column: &ColumnKey,
        edit: impl FnOnce(&mut std::collections::BTreeSet<i64>),
    ) -> Self {
        let Some(selected) = self.filters.get_mut(column) else {
            warn!("Ignoring filter change for unknown column '{column}'");
            return self;
        };
        edit(selected);
        debug!("Filter on '{column}' is now {selected:?}");
        self.page = PageState::default();
        self
    }

    fn navigate(mut self, step: fn(&Paging, PageState, usize) -> PageState) -> Self {
        let total_rows = self.filtered_rows().len();
        self.page = step(&self.paging, self.page, total_rows);
        self
    }
}
