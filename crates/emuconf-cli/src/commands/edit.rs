use super::context::SessionContext;
use anyhow::Result;
use tracing::warn;

pub fn set(
    context: &mut SessionContext,
    store: &str,
    section: &str,
    key: &str,
    value: &str,
) -> Result<()> {
    context
        .settings
        .get_section(store, section)?
        .set(key, value);
    context.settings.save_settings()?;
    Ok(())
}

pub fn clear(context: &mut SessionContext) -> Result<()> {
    context.settings.clear_settings();
    context.settings.save_settings()?;
    Ok(())
}

pub fn check_junk(context: &mut SessionContext, delete: bool) -> Result<()> {
    let settings = &mut context.settings;
    let Some(game_id) = settings.scoped_id().map(str::to_string) else {
        println!("Not a game session; pass --game <ID>");
        return Ok(());
    };

    if !settings.scoped_store_contains_legacy_junk() {
        println!("{game_id}: clean");
        return Ok(());
    }

    println!("{game_id}: contains settings copied from the global files");
    if delete {
        warn!("Discarding settings file of {}", game_id);
        settings.clear_settings();
        settings.save_settings()?;
        println!("{game_id}: settings file emptied");
    }
    Ok(())
}
