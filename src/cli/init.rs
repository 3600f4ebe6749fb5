use crate::console::Console;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_file_exists, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    } else if !settings_file_exists() {
        // First run: offer to change the data directory.
        let stdin = std::io::stdin();
        let mut console = Console::new(stdin.lock(), std::io::stdout());
        let prompt = format!("Data directory [{}]: ", settings.data_dir);
        if let Some(chosen) = console.read_line(&prompt)? {
            if !chosen.is_empty() {
                settings.data_dir = shellexpand_path(&chosen);
            }
        }
    }

    save_settings(&settings)?;

    let resolved = settings.data_path();
    std::fs::create_dir_all(&resolved)?;
    log::info!("initialized data directory {}", resolved.display());

    println!("Initialized tally at {}", resolved.display());
    println!("Budget file:     {}", settings.budget_path().display());
    println!("Flashcards file: {}", settings.flashcards_path().display());
    Ok(())
}
