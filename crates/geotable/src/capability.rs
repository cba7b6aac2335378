//! Renderer backend availability.

/// Backends available to this build, computed once and passed to format
/// selection.
///
/// # Example
///
/// ```
/// # use geotable::Capabilities;
/// let caps = Capabilities::without_paginated();
/// assert!(!caps.paginated());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    paginated: bool,
}

impl Capabilities {
    /// Capabilities of this build. The paginated backend is present when the
    /// crate is built with the `pdf` feature.
    pub fn detect() -> Self {
        Self {
            paginated: cfg!(feature = "pdf"),
        }
    }

    /// Capabilities with the paginated backend switched off.
    pub fn without_paginated() -> Self {
        Self { paginated: false }
    }

    /// Whether paginated documents can be produced.
    pub fn paginated(&self) -> bool {
        self.paginated
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_follows_feature() {
        assert_eq!(Capabilities::detect().paginated(), cfg!(feature = "pdf"));
    }

    #[test]
    fn test_without_paginated() {
        assert!(!Capabilities::without_paginated().paginated());
    }
}
