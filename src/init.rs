use crate::config::write_template;
use crate::error::Result;
use crate::ui;
use std::path::PathBuf;

pub fn execute(path: PathBuf, force: bool) -> Result<()> {
    write_template(&path, force)?;
    ui::success_message(&format!("Wrote {}", path.display()));
    ui::info_message("Edit the [github] table, or remove it to run in local-only mode");
    Ok(())
}
