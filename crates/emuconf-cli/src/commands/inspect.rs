use super::context::SessionContext;
use anyhow::{Result, bail};
use serde_json::{Map, Value};

pub fn show(context: &SessionContext) -> Result<()> {
    let settings = &context.settings;
    let mut stores = Map::new();
    for (name, store) in settings.loaded_stores() {
        // The scoped placeholder key means nothing to a reader.
        let label = settings.scoped_id().unwrap_or(name);
        stores.insert(label.to_string(), serde_json::to_value(store)?);
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(stores))?);
    Ok(())
}

pub fn get(context: &SessionContext, store: &str, section: &str, key: &str) -> Result<()> {
    let value = context
        .settings
        .find_section(store, section)?
        .and_then(|s| s.get(key));

    match value {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => bail!("{store}/{section}/{key} is not set"),
    }
}
