use std::{
    fs::File,
    io::{BufReader, ErrorKind, Read},
};

use tracing::{debug, info};

use crate::{
    ConvertConfig, DatabaseAdapter, Executor, ImportStats, InputError, ProgressReader, Result,
    SourceDialect, StatementKind, StatementSegmenter, TargetDialect,
};

const READ_BUFFER_CAPACITY: usize = 256 * 1024;

/// Drives one conversion: segment, classify, rewrite, execute.
pub struct Orchestrator<'a> {
    source: &'a dyn SourceDialect,
    target: &'a dyn TargetDialect,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(source: &'a dyn SourceDialect, target: &'a dyn TargetDialect) -> Self {
        Self { source, target }
    }

    pub fn run(&self, config: &ConvertConfig) -> Result<ImportStats> {
        self.run_with_progress(config, |_| {})
    }

    /// Like [`Orchestrator::run`], calling `on_progress` with the number of
    /// input bytes consumed so far. Reads are buffered, so the count runs
    /// ahead of the statement currently being executed.
    pub fn run_with_progress(
        &self,
        config: &ConvertConfig,
        on_progress: impl FnMut(u64),
    ) -> Result<ImportStats> {
        let input = open_input(config)?;
        let adapter = self.target.recreate(&config.output_path)?;
        info!(
            input = %config.input_path.display(),
            output = %config.output_path.display(),
            source = self.source.name(),
            target = self.target.name(),
            "starting conversion"
        );

        let stats = self.import(ProgressReader::new(input, on_progress), adapter.as_ref(), config)?;
        adapter.close()?;

        info!(
            statements = stats.statements_read,
            tables = stats.tables_created,
            inserts = stats.inserts_applied,
            suppressed = stats.suppressed_failures(),
            "conversion finished"
        );
        Ok(stats)
    }

    /// Streams `reader` into an already opened store inside one transaction.
    pub fn import<R: Read>(
        &self,
        reader: R,
        adapter: &dyn DatabaseAdapter,
        config: &ConvertConfig,
    ) -> Result<ImportStats> {
        import_stream(self.source, reader, adapter, config)
    }
}

/// The segment, rewrite and execute loop behind [`Orchestrator::import`], for
/// callers that manage the store themselves.
pub fn import_stream<R: Read>(
    source: &dyn SourceDialect,
    reader: R,
    adapter: &dyn DatabaseAdapter,
    config: &ConvertConfig,
) -> Result<ImportStats> {
    let denylist = config
        .denylist_prefixes
        .clone()
        .unwrap_or_else(|| source.default_denylist());
    let segmenter = StatementSegmenter::new(
        BufReader::with_capacity(READ_BUFFER_CAPACITY, reader),
        denylist,
    );

    adapter.begin()?;
    let mut executor = Executor::new(adapter, config.insert_errors);

    for raw in segmenter {
        let raw = raw?;
        executor.stats_mut().record_read();

        let kind = source.classify(&raw);
        let line = raw.source_location.line;
        match source.rewrite(raw) {
            Some(statement) => {
                executor.apply(&statement);
            }
            None => {
                if kind == StatementKind::TableDefinition {
                    debug!(line, "skipping table definition that could not be rewritten");
                } else {
                    debug!(line, kind = kind.tag(), "ignoring statement");
                }
                executor.stats_mut().record_dropped(kind);
            }
        }
    }

    let stats = executor.finish();
    adapter.commit()?;
    Ok(stats)
}

fn open_input(config: &ConvertConfig) -> Result<File> {
    File::open(&config.input_path).map_err(|source| {
        let path = config.input_path.clone();
        if source.kind() == ErrorKind::NotFound {
            InputError::Missing { path }.into()
        } else {
            InputError::Open { path, source }.into()
        }
    })
}
