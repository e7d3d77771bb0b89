//! `vicon teardown`

use anyhow::Result;

use crate::cli::help::print_banner;
use crate::cli::prompt::confirm;
use crate::config::ConfigStore;

pub async fn run_teardown(auto_accept: bool) -> Result<()> {
    print_banner();

    let store = ConfigStore::from_env()?;
    let path = store.path();
    if !path.exists() {
        println!("Nothing to remove: no configuration at {}", path.display());
        return Ok(());
    }

    if !auto_accept && !confirm(&format!("Delete {}?", path.display()))? {
        println!("Cancelled.");
        return Ok(());
    }

    if store.delete()? {
        println!("Removed {}", path.display());
    }
    Ok(())
}
