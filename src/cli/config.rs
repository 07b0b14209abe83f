use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

pub fn run(
    strict: Option<bool>,
    extended: Option<bool>,
    export_dir: Option<String>,
    user_name: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();
    let changed = strict.is_some()
        || extended.is_some()
        || export_dir.is_some()
        || user_name.is_some();

    if let Some(v) = strict {
        settings.strict_validation = v;
    }
    if let Some(v) = extended {
        settings.extended_metrics = v;
    }
    if let Some(dir) = export_dir {
        settings.export_dir = shellexpand_path(&dir);
    }
    if let Some(name) = user_name {
        settings.user_name = name;
    }
    if changed {
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    let user = if settings.user_name.is_empty() {
        "(not set)"
    } else {
        settings.user_name.as_str()
    };
    println!("User:              {user}");
    println!("Export dir:        {}", settings.export_dir);
    println!("Strict validation: {}", on_off(settings.strict_validation));
    println!("Extended metrics:  {}", on_off(settings.extended_metrics));
    Ok(())
}
