/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Form,       // Adding or editing a task
    Confirm,    // Waiting for y/n on a destructive action
    Categories, // Category manager
    CategoryPrompt,
    Chart,
}

/// Fields of the add/edit form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Worker,
    Estimate,
    Category,
    StartYear,
    StartMonth,
    StartDay,
    EndYear,
    EndMonth,
    EndDay,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Name,
            FormField::Worker,
            FormField::Estimate,
            FormField::Category,
            FormField::StartYear,
            FormField::StartMonth,
            FormField::StartDay,
            FormField::EndYear,
            FormField::EndMonth,
            FormField::EndDay,
        ]
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }

    /// Free-text fields take typed characters; the rest are selectors
    pub fn is_text(self) -> bool {
        matches!(self, FormField::Name | FormField::Worker | FormField::Estimate)
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Worker => "Worker",
            FormField::Estimate => "Estimate (h)",
            FormField::Category => "Category",
            FormField::StartYear | FormField::StartMonth | FormField::StartDay => "Start",
            FormField::EndYear | FormField::EndMonth | FormField::EndDay => "Due",
        }
    }
}

/// Destructive action waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask(usize),
    DeleteCategory(String),
}

/// Severity of a status-bar message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}
