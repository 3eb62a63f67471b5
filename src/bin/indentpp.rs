use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser;
use simple_logger::SimpleLogger;

use indentpp::cli::{default_output_path, Cli};
use indentpp::{diagnostics, translate_file, Config};

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .with_colors(true)
        .without_timestamps()
        .init()
        .unwrap();

    let args = Cli::parse();
    if let Err(e) = run(args) {
        eprintln!("indentpp: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Cli) -> Result<()> {
    let config = Config {
        source_ext: args.source_ext.clone(),
        header_ext: args.header_ext.clone(),
        search_dirs: args.include_dirs.clone(),
        tab_width: args.tab_width,
    };

    if args.rewrite_diagnostics {
        return rewrite_diagnostics(&args, &config);
    }

    let unit = translate_file(&args.file, &config)
        .with_context(|| format!("translating {}", args.file.display()))?;

    #[cfg(feature = "json-map")]
    if let Some(map_path) = &args.emit_map {
        let json = unit.mapper.to_json().context("serializing location map")?;
        std::fs::write(map_path, json)
            .with_context(|| format!("writing location map to {}", map_path.display()))?;
    }

    write_output(&args, &unit.output)
}

fn write_output(args: &Cli, generated: &str) -> Result<()> {
    match args.output.as_deref() {
        Some("-") => {
            print!("{}", generated);
            Ok(())
        }
        Some(path) => std::fs::write(path, generated).with_context(|| format!("writing {}", path)),
        None => {
            let path = default_output_path(&args.file);
            std::fs::write(&path, generated).with_context(|| format!("writing {}", path.display()))
        }
    }
}

fn rewrite_diagnostics(args: &Cli, config: &Config) -> Result<()> {
    let unit = translate_file(&args.file, config)
        .with_context(|| format!("translating {}", args.file.display()))?;
    let generated_name = default_output_path(&args.file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut compiler_output = String::new();
    io::stdin()
        .read_to_string(&mut compiler_output)
        .context("reading compiler output from stdin")?;

    let rewritten = diagnostics::rewrite_diagnostics(&compiler_output, &generated_name, &unit.mapper);
    println!("{}", rewritten);
    Ok(())
}
