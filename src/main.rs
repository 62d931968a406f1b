use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scite_rhai::ScriptExtension;
use scite_rhai::config::Settings;
use scite_rhai::events::Event;
use scite_rhai::host::{
    Host, MemoryHost, Pane, SCITE_DIRECTORY_PROPERTY, SCITE_USER_DIRECTORY_PROPERTY,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("usage: scite-rhai <properties-file> [events.json]");
    std::process::exit(2);
}

fn read(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()).into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line args
    let args: Vec<String> = env::args().collect();
    let Some(properties_path) = args.get(1).map(PathBuf::from) else {
        usage();
    };
    let events_path = args.get(2).map(PathBuf::from);

    let host = Arc::new(MemoryHost::new());
    host.load_properties(&read(&properties_path)?);

    // Module paths resolve against the properties file's directory by default
    if host.property(SCITE_DIRECTORY_PROPERTY).is_empty() {
        let home = properties_path
            .canonicalize()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        host.set_property(SCITE_DIRECTORY_PROPERTY, &home.to_string_lossy());
    }
    if host.property(SCITE_USER_DIRECTORY_PROPERTY).is_empty() {
        if let Some(config_dir) = Settings::config_dir() {
            host.set_property(SCITE_USER_DIRECTORY_PROPERTY, &config_dir.to_string_lossy());
        }
    }
    if let Some(user_file) = Settings::user_properties_file().filter(|p| p.is_file()) {
        info!(path = %user_file.display(), "loading user properties");
        host.load_properties(&read(&user_file)?);
    }

    let mut extension = ScriptExtension::new(host.clone());
    if let Err(err) = extension.initialise() {
        warn!("initialisation failed: {err}");
    }

    if let Some(events_path) = events_path {
        let events: Vec<Event> = serde_json::from_str(&read(&events_path)?)?;
        for event in &events {
            // The editor only reports events someone asked for
            if !host.notification_enabled(event.name()) {
                continue;
            }
            let stopped = extension.on_event(event);
            info!(event = event.name(), stopped, "delivered event");
        }
    }

    print!("{}", host.pane_text(Pane::Output));
    Ok(())
}
