/// Outcome of a backend lookup that reached a terminal state without failing.
///
/// `Err` of the surrounding `Result` is reserved for backend failures, so each
/// stage of a pipeline decides explicitly whether to short-circuit on
/// `Empty`/`NotConnected` or to propagate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// The backend answered with no data.
    Empty,
    /// No backend handle is available yet.
    NotConnected,
}

impl<T> Lookup<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Empty => Lookup::Empty,
            Self::NotConnected => Lookup::NotConnected,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Empty | Self::NotConnected => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        !matches!(self, Self::NotConnected)
    }
}

impl<T: Default> Lookup<T> {
    /// `[]`, `false` or the type's empty value unless something was found.
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}
