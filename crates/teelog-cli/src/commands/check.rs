//! Validate a configuration file and describe the tee it builds.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use teelog_core::TeeConfigExt;
use teelog_types::{LevelRange, Rotation, SinkConfig, TeeConfig};

pub fn execute(path: &Path, verbose: bool) -> Result<()> {
    let config = TeeConfig::load(path)
        .with_context(|| format!("Invalid configuration {}", path.display()))?;
    tracing::debug!(sinks = config.sinks.len(), "configuration loaded");

    println!(
        "{} {} ({} sink{})",
        "Valid".green().bold(),
        path.display(),
        config.sinks.len(),
        if config.sinks.len() == 1 { "" } else { "s" }
    );

    let base = config.resolved_base_path();
    for (idx, sink) in config.sinks.iter().enumerate() {
        println!("  #{} {}", idx, describe(sink, &base));
    }

    if verbose {
        println!("\n{}", "Logger:".cyan().bold());
        println!("  Caller: {}", config.caller);
        println!(
            "  Stacktrace: {}",
            config
                .stacktrace
                .map_or_else(|| "off".to_string(), |level| format!("{} and up", level))
        );
        println!("  Development: {}", config.development);
        if let Some(name) = &config.name {
            println!("  Name: {}", name);
        }
    }

    Ok(())
}

fn describe(sink: &SinkConfig, base: &str) -> String {
    let target = match (&sink.file, sink.console) {
        (Some(file), _) if Path::new(file).is_absolute() => file.clone(),
        (Some(file), _) => format!("{}{}", base, file),
        (None, Some(stream)) => format!("<{:?}>", stream).to_lowercase(),
        (None, None) => "<none>".to_string(),
    };

    let mut parts = vec![sink.format.to_string(), levels(&sink.levels)];
    if sink.file.is_some() {
        parts.push(match &sink.rotation {
            Rotation::Size(opts) => format!("rotate at {} MB", opts.max_bytes() / 1024 / 1024),
            Rotation::Time { period, .. } => format!("roll {:?}", period).to_lowercase(),
        });
    }

    format!("{} [{}]", target.bold(), parts.join(", "))
}

fn levels(range: &LevelRange) -> String {
    match (range.min, range.max) {
        (None, None) => "all levels".to_string(),
        (Some(min), None) => format!("{} and up", min),
        (None, Some(max)) => format!("up to {}", max),
        (Some(min), Some(max)) if min == max => format!("{} only", min),
        (Some(min), Some(max)) => format!("{}..={}", min, max),
    }
}
