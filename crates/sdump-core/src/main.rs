//! `scenedump` command-line interface

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use sdump_core::{init_tracing, DumpConfig, Pipeline, ReportMode};
use sdump_scene::ParsedScene;
use std::fs;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("scenedump")
        .version(sdump_core::VERSION)
        .about("Scene hierarchy dumps and unused script detection")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Raise log level (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("run")
                .about("Dump every scene and write the unused script report")
                .arg(
                    Arg::new("project")
                        .long("project")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Project root directory"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for dumps and the report"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("threads")
                        .long("threads")
                        .value_parser(value_parser!(usize))
                        .help("Worker threads"),
                )
                .arg(
                    Arg::new("append")
                        .long("append")
                        .action(ArgAction::SetTrue)
                        .help("Append to the report instead of rewriting it"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the run summary as JSON"),
                ),
        )
        .subcommand(
            Command::new("hierarchy")
                .about("Print one scene's hierarchy")
                .arg(
                    Arg::new("scene")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Scene file"),
                ),
        )
}

fn run(args: &ArgMatches) -> anyhow::Result<()> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => DumpConfig::load(path)?,
        None => DumpConfig::default(),
    };
    if let Some(project) = args.get_one::<PathBuf>("project") {
        config = config.with_project_dir(project);
    }
    if let Some(output) = args.get_one::<PathBuf>("output") {
        config = config.with_output_dir(output);
    }
    if let Some(&threads) = args.get_one::<usize>("threads") {
        config = config.with_threads(threads);
    }
    if args.get_flag("append") {
        config = config.with_report_mode(ReportMode::Append);
    }

    let summary = Pipeline::new(config).run().context("run aborted")?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn hierarchy(args: &ArgMatches) -> anyhow::Result<()> {
    let path = args
        .get_one::<PathBuf>("scene")
        .ok_or_else(|| anyhow!("scene file is required"))?;
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let scene = ParsedScene::parse(&text);
    let hierarchy = scene.hierarchy();

    for rejected in &scene.rejected {
        eprintln!("rejected: {rejected}");
    }
    for fault in &hierarchy.faults {
        eprintln!("{}: {fault}", if fault.is_notice() { "notice" } else { "fault" });
    }
    hierarchy.write_dump(std::io::stdout().lock())?;
    Ok(())
}

fn main() {
    let matches = cli().get_matches();

    if let Err(err) = init_tracing(matches.get_count("verbose"), matches.get_flag("log-json")) {
        eprintln!("warning: logging not initialized: {err}");
    }

    let result = match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("hierarchy", args)) => hierarchy(args),
        _ => Err(anyhow!("unknown command")),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
