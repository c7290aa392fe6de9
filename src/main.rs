use std::{fs, process};

use anyhow::{bail, Context, Result};

use birthday_reveal::{config::ExperienceConfig, director::Director, host::Host};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "birthday-reveal play [config.json]";
const CHECK_USAGE: &str = "birthday-reveal check <config.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("play") => play(args.next().as_deref()),
        Some("check") => {
            let path = args.next().context(CHECK_USAGE)?;
            check(&path)
        }
        _ => bail!(
            "birthday-reveal — a scripted reveal experience for the terminal\n\nUsage:\n  {PLAY_USAGE}\n  {CHECK_USAGE}\n\nWith no config file, `play` runs the stock experience."
        ),
    }
}

fn load(path: &str) -> Result<ExperienceConfig> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))
}

fn play(path: Option<&str>) -> Result<()> {
    let config = match path {
        Some(path) => load(path)?,
        None => ExperienceConfig::default(),
    };
    for note in config.lint() {
        log::warn!("{note}");
    }
    let mut host = Host::new(Director::new(config));
    host.run()
}

fn check(path: &str) -> Result<()> {
    let config = load(path)?;
    let notes = config.lint();
    eprintln!(
        "{}: {} script lines, {} objects, {} gate messages",
        path,
        config.script.lines.len(),
        config.objects.len(),
        config.gate.no_messages.len(),
    );
    for note in &notes {
        eprintln!("  note: {note}");
    }
    if notes.is_empty() {
        eprintln!("  ok");
    }
    Ok(())
}
