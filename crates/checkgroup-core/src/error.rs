use checkgroup_model::GroupingError;
use checkgroup_panel::PanelError;
use checkgroup_settings::SettingsError;
use thiserror::Error;

/// Errors from a [`GroupingSession`](crate::GroupingSession).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The grouping context was requested before any grouping was computed.
    #[error("No grouping has been computed for this session yet")]
    NoActiveGrouping,

    /// The rule list failed the same checks applied when settings load.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Panel(#[from] PanelError),

    #[error(transparent)]
    Grouping(#[from] GroupingError),

    #[error("Failed to fingerprint grouping inputs: {0}")]
    Fingerprint(#[from] serde_json::Error),
}
