use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%)";

/// A byte-based bar over the input file, hidden when progress is disabled.
pub(crate) fn byte_progress(total_bytes: Option<u64>, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total_bytes.unwrap_or(0));
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map_or_else(
            |_| ProgressStyle::default_bar(),
            |style| style.progress_chars("=>-"),
        );
    bar.set_style(style);
    bar
}
