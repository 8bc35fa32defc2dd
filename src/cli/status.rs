use crate::display::display_session;
use crate::error::Result;
use crate::models::config::ConfigPaths;
use crate::models::Session;

pub fn show_status() -> Result<()> {
    let session = Session::load(&ConfigPaths::resolve()?)?;
    display_session(&session);
    Ok(())
}
