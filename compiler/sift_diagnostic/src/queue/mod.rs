//! Collection of construction diagnostics for one build session.
//!
//! The queue caps the number of errors, drops errors that only restate a
//! fault already reported on an operand, collapses repeats on one line and
//! silences soft errors once a hard one is in. [`DiagnosticQueue::flush`]
//! hands the survivors back in source order.

use std::hash::{Hash, Hasher};

use crate::{Diagnostic, ErrorGuaranteed};

/// Characters of the message compared when collapsing repeats.
const MESSAGE_PREFIX_LEN: usize = 30;

/// Text the describer renders for an operand in the error state.
const ERROR_OPERAND_MARKER: &str = "<error>";

fn message_prefix_hash(msg: &str) -> u64 {
    let end = msg
        .char_indices()
        .nth(MESSAGE_PREFIX_LEN)
        .map_or(msg.len(), |(idx, _)| idx);
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    msg[..end].hash(&mut hasher);
    hasher.finish()
}

/// Whether a diagnostic survives an earlier hard error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Always reported.
    Hard,
    /// Dropped once a hard error has been recorded.
    Soft,
}

/// Limits and filtering applied by a [`DiagnosticQueue`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors accepted before everything else is dropped; 0 means no cap.
    pub error_limit: usize,
    /// Drop errors whose labels describe an operand already in error.
    pub filter_follow_on: bool,
    /// Collapse errors on one line that share a message prefix.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 10,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Accept everything.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: false,
            deduplicate: false,
        }
    }
}

/// 1-based source position used for ordering and line dedup.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Position {
    line: u32,
    column: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct Entry {
    pos: Position,
    diagnostic: Diagnostic,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DiagnosticQueue {
    entries: Vec<Entry>,
    error_count: usize,
    /// Line and message-prefix hash of the last accepted error.
    last_error: Option<(u32, u64)>,
    seen_hard_error: bool,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Record `diag`, positioned by its primary span alone.
    ///
    /// Without source text every span sits on line 1 and the byte offset
    /// orders diagnostics. Returns whether the diagnostic was kept.
    pub fn add_spanned(&mut self, diag: Diagnostic, severity: DiagnosticSeverity) -> bool {
        let column = diag
            .primary_span()
            .map_or(1, |span| span.start.saturating_add(1));
        self.push(diag, Position { line: 1, column }, severity)
    }

    /// Record `diag`, positioned by resolving its primary span in `source`.
    pub fn add_with_source(
        &mut self,
        diag: Diagnostic,
        source: &str,
        severity: DiagnosticSeverity,
    ) -> bool {
        let (line, column) = diag.primary_span().map_or((1, 1), |span| {
            crate::span_utils::offset_to_line_col(source, span.start)
        });
        self.push(diag, Position { line, column }, severity)
    }

    fn push(&mut self, diag: Diagnostic, pos: Position, severity: DiagnosticSeverity) -> bool {
        if self.limit_reached() {
            return false;
        }
        if severity == DiagnosticSeverity::Soft && self.seen_hard_error {
            return false;
        }
        if diag.is_error() {
            if self.config.filter_follow_on && is_follow_on(&diag) {
                return false;
            }
            let key = (pos.line, message_prefix_hash(&diag.message));
            if self.config.deduplicate && self.last_error == Some(key) {
                return false;
            }
            self.last_error = Some(key);
            self.seen_hard_error |= severity == DiagnosticSeverity::Hard;
            self.error_count += 1;
        }
        self.entries.push(Entry {
            pos,
            diagnostic: diag,
        });
        true
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// `Some` if at least one error was recorded.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.error_count)
    }

    /// Hand back everything recorded, in source order, and reset.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        self.entries.sort_by_key(|e| e.pos);
        self.error_count = 0;
        self.last_error = None;
        self.seen_hard_error = false;
        self.entries.drain(..).map(|e| e.diagnostic).collect()
    }

    /// Everything recorded so far, in insertion order.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|e| &e.diagnostic)
    }
}

fn is_follow_on(diag: &Diagnostic) -> bool {
    diag.labels
        .iter()
        .any(|l| l.message.contains(ERROR_OPERAND_MARKER))
}
