//! Configuration inspection commands.

use reviewlens::Config;

use crate::cli::icons;

/// Print the effective configuration as JSON.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    println!("{}", json);

    let source = config
        .source_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    eprintln!("{} Source: {}", icons::dim_arrow(), source);
    eprintln!("{} Hash: {}", icons::dim_arrow(), &config.hash()[..16]);
    eprintln!(
        "{} Dataset: {}",
        icons::dim_arrow(),
        config.dataset_path(None).display()
    );
    Ok(())
}

/// Print the config file path, if one was found.
pub fn cmd_config_path(config: &Config) -> anyhow::Result<()> {
    match config.source_path {
        Some(ref path) => println!("{}", path.display()),
        None => eprintln!(
            "{} No config file found; using defaults and environment",
            icons::warn()
        ),
    }
    Ok(())
}
