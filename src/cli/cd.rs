use crate::error::Result;
use crate::models::config::ConfigPaths;
use crate::models::Session;

// usage: cd "$(forces cd)"
pub fn print_working_directory() -> Result<()> {
    let session = Session::load(&ConfigPaths::resolve()?)?;
    println!("{}", session.working_directory.display());
    Ok(())
}
