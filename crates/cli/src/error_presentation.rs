use dumpconv_core::Error;
use miette::Report;

const CONVERSION_CONTEXT: &str = "while converting dump";
const RUNTIME_FAILURE_EXIT_CODE: u8 = 1;
const USAGE_EXIT_CODE: u8 = 2;

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    EmptyDenyPrefix,
    Core(Error),
}

impl From<Error> for CliError {
    fn from(value: Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn exit_code(error: &CliError) -> u8 {
    match error {
        CliError::EmptyDenyPrefix => USAGE_EXIT_CODE,
        CliError::Core(_) => RUNTIME_FAILURE_EXIT_CODE,
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::EmptyDenyPrefix => format!("[usage] {}", empty_deny_prefix_message()),
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, CONVERSION_CONTEXT);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let anyhow_error = anyhow::Error::new(source).context(context.into());
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &Error) -> &'static str {
    match error {
        Error::Input(_) => "input",
        Error::Store(_) => "store",
        Error::Execute(_) => "execute",
    }
}

fn empty_deny_prefix_message() -> &'static str {
    "--deny-prefix must not be empty: an empty prefix would skip every line of the dump"
}
