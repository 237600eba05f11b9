//! Error accumulation across independent collection steps
//!
//! Every failure observed during an assessment run is kept, in order, so the
//! report can list all of them. A failure may also be flagged as fatal, which
//! tells the caller to stop collecting.

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Conditions raised by the assessment itself (as opposed to API failures)
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unable to get node info: the cluster returned no nodes")]
    NoNodes,

    #[error("unable to detect CNI (no pod matches {0}) - is this K3s?")]
    NetworkPluginUndetected(String),
}

/// Marker returned when a fatal error stops the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halt;

/// Ordered collection of errors with fatal tracking
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    errors: Vec<anyhow::Error>,
    has_errors: bool,
    fatal: bool,
    fatal_index: Option<usize>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, if there is one.
    ///
    /// Returns `true` only when this call is the first fatal report, meaning
    /// the caller should stop the run now. Absent errors are ignored.
    pub fn add(&mut self, error: Option<anyhow::Error>, fatal: bool) -> bool {
        let Some(error) = error else {
            return false;
        };

        self.errors.push(error);
        self.has_errors = true;

        if fatal && !self.fatal {
            self.fatal = true;
            self.fatal_index = Some(self.errors.len() - 1);
            return true;
        }
        false
    }

    /// Unwrap a step result, recording its error.
    ///
    /// A failed non-fatal step yields `T::default()` so the snapshot field
    /// stays empty. A failed fatal step yields `Err(Halt)`.
    pub fn absorb<T: Default>(
        &mut self,
        result: anyhow::Result<T>,
        fatal: bool,
    ) -> Result<T, Halt> {
        match result {
            Ok(value) => Ok(value),
            Err(error) => {
                if self.add(Some(error), fatal) {
                    Err(Halt)
                } else {
                    Ok(T::default())
                }
            }
        }
    }

    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    /// The error that set the fatal flag
    pub fn fatal_error(&self) -> Option<&anyhow::Error> {
        self.fatal_index.and_then(|i| self.errors.get(i))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Serialize for ErrorAccumulator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let messages: Vec<String> = self.errors.iter().map(|e| format!("{:#}", e)).collect();
        let mut state = serializer.serialize_struct("Errors", 3)?;
        state.serialize_field("errors", &messages)?;
        state.serialize_field("hasErrors", &self.has_errors)?;
        state.serialize_field("fatal", &self.fatal)?;
        state.end()
    }
}
