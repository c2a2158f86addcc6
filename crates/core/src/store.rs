use backreel_protocol::ViewState;

/// Capability: the client-local persistence behind view state.
///
/// The surface is deliberately infallible: persistence problems are a
/// degraded mode, never an error the rest of the engine has to handle.
/// Implementations log failures; on a failed write the in-memory state
/// simply remains the source of truth until the next successful mutation.
pub trait StateStore {
    /// The persisted view state for `series`, or the default (nothing
    /// hidden, top of feed) when the record is missing or unreadable.
    fn load(&self, series: &str) -> ViewState;

    /// Persist the view state for `series`. Other series' records are left
    /// untouched. Failures are logged and swallowed.
    fn save(&mut self, series: &str, state: &ViewState);

    /// The persisted current-series selection, if any.
    fn load_series(&self) -> Option<String>;

    /// Persist the current-series selection.
    fn save_series(&mut self, series: &str);
}
