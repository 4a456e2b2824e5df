//! Streaming conversion of relational dumps between SQL dialects.
//!
//! A run is a single-threaded pipe: [`StatementSegmenter`] cuts the input into
//! [`RawStatement`]s, a [`SourceDialect`] rewrites each one, and the
//! [`Executor`] applies the result to a [`DatabaseAdapter`] opened by a
//! [`TargetDialect`]. [`Orchestrator`] wires the stages together.

mod adapter;
mod config;
mod dialect;
mod error;
mod executor;
mod orchestrator;
mod progress;
mod segmenter;
mod statement;
mod stats;

pub use adapter::DatabaseAdapter;
pub use config::{ConvertConfig, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, InsertErrorMode};
pub use dialect::{SourceDialect, TargetDialect};
pub use error::{
    BoxedError, Error, ExecutionError, InputError, Result, SourceLocation, StoreError,
};
pub use executor::{ExecutionOutcome, Executor};
pub use orchestrator::{Orchestrator, import_stream};
pub use progress::ProgressReader;
pub use segmenter::{STATEMENT_TERMINATOR, StatementSegmenter};
pub use statement::{ExecutableStatement, RawStatement, StatementKind};
pub use stats::ImportStats;
