use std::fmt;

use crate::StatementKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub statements_read: u64,
    pub tables_created: u64,
    pub tables_failed: u64,
    /// Table definitions that could not be rewritten (no name, no body, no columns).
    pub tables_skipped: u64,
    pub inserts_applied: u64,
    pub inserts_failed: u64,
    pub drops_applied: u64,
    pub drops_failed: u64,
    pub ignored: u64,
    /// Failures that were counted but never reported.
    pub suppressed: u64,
}

impl ImportStats {
    pub(crate) fn record_read(&mut self) {
        self.statements_read += 1;
    }

    pub(crate) fn record_dropped(&mut self, kind: StatementKind) {
        match kind {
            StatementKind::TableDefinition => self.tables_skipped += 1,
            StatementKind::Insert | StatementKind::Drop | StatementKind::Ignored => {
                self.ignored += 1;
            }
        }
    }

    pub(crate) fn record_applied(&mut self, kind: StatementKind) {
        match kind {
            StatementKind::TableDefinition => self.tables_created += 1,
            StatementKind::Insert => self.inserts_applied += 1,
            StatementKind::Drop => self.drops_applied += 1,
            StatementKind::Ignored => {}
        }
    }

    pub(crate) fn record_failed(&mut self, kind: StatementKind, reported: bool) {
        match kind {
            StatementKind::TableDefinition => self.tables_failed += 1,
            StatementKind::Insert => self.inserts_failed += 1,
            StatementKind::Drop => self.drops_failed += 1,
            StatementKind::Ignored => {}
        }
        if !reported {
            self.suppressed += 1;
        }
    }

    #[must_use]
    pub fn suppressed_failures(&self) -> u64 {
        self.suppressed
    }
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "statements read: {}", self.statements_read)?;
        writeln!(
            f,
            "tables created:  {} (failed: {}, skipped: {})",
            self.tables_created, self.tables_failed, self.tables_skipped
        )?;
        writeln!(
            f,
            "inserts applied: {} (failed: {})",
            self.inserts_applied, self.inserts_failed
        )?;
        writeln!(
            f,
            "drops applied:   {} (failed: {})",
            self.drops_applied, self.drops_failed
        )?;
        write!(f, "ignored:         {}", self.ignored)
    }
}
