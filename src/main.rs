use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{command, value_parser, Arg, ArgAction, ArgMatches, Command};
use log::error;
use postmatter::{
    index::{save_index, Index},
    loader::{load_dir, load_file, ErrorPolicy, LoadOptions},
};

fn article_dir_arg() -> Arg {
    Arg::new("article_dir")
        .help("Directory path of articles")
        .value_parser(value_parser!(PathBuf))
        .default_value("posts")
}

fn include_drafts_arg() -> Arg {
    Arg::new("include_drafts")
        .long("include-drafts")
        .help("Load posts marked as draft too")
        .action(ArgAction::SetTrue)
}

fn article_dir(matches: &ArgMatches) -> anyhow::Result<&PathBuf> {
    let article_dir: &PathBuf = matches
        .get_one("article_dir")
        .context("article_dir is required")?;
    if !article_dir.is_dir() {
        bail!("article_dir must be a directory.");
    }
    Ok(article_dir)
}

fn check(matches: &ArgMatches) -> anyhow::Result<()> {
    let article_dir = article_dir(matches)?;
    let options = LoadOptions {
        include_drafts: true,
        ..Default::default()
    };
    let report = load_dir(article_dir, &options)?;

    for failure in report.failures.iter() {
        let tag = match failure.error.parse_error() {
            Some(e) => match e.key() {
                Some(key) => format!("{} {key}", e.kind().as_str()),
                None => e.kind().as_str().to_string(),
            },
            None => "io".to_string(),
        };
        error!("{:?}: [{tag}] {}", failure.path, failure.error);
    }
    println!(
        "{} ok, {} failed",
        report.entries.len(),
        report.failures.len()
    );
    if !report.failures.is_empty() {
        bail!("{} posts failed to load", report.failures.len());
    }
    Ok(())
}

fn index(matches: &ArgMatches) -> anyhow::Result<()> {
    let article_dir = article_dir(matches)?;
    let out: &PathBuf = matches.get_one("out").context("out is required")?;
    if out.is_dir() {
        bail!("out must be a file path.");
    }
    let summary_words: usize = *matches
        .get_one("summary_words")
        .context("summary_words is required")?;

    let options = LoadOptions {
        include_drafts: matches.get_flag("include_drafts"),
        on_error: if matches.get_flag("strict") {
            ErrorPolicy::Abort
        } else {
            ErrorPolicy::Skip
        },
        ..Default::default()
    };
    let report = load_dir(article_dir, &options)?;

    let blog_name = std::env::var("BLOG_NAME").unwrap_or("".to_string());
    let index = Index::build(&blog_name, &report.entries, summary_words);
    save_index(out, &index)
}

fn show(matches: &ArgMatches) -> anyhow::Result<()> {
    let file: &PathBuf = matches.get_one("file").context("file is required")?;
    let entry = load_file(file)?;
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .subcommand_required(true)
        .subcommand(
            Command::new("check")
                .about("Parse every post and report the ones that fail")
                .arg(article_dir_arg()),
        )
        .subcommand(
            Command::new("index")
                .about("Write a JSON index of all posts")
                .args(&[
                    article_dir_arg(),
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .help("Path of the index file. Existing file will be overwritten.")
                        .value_parser(value_parser!(PathBuf))
                        .default_value("index.json"),
                    include_drafts_arg(),
                    Arg::new("summary_words")
                        .long("summary-words")
                        .help("Word limit of summaries for posts without <!--more-->")
                        .value_parser(value_parser!(usize))
                        .default_value("70"),
                    Arg::new("strict")
                        .long("strict")
                        .help("Stop at the first post that fails to parse")
                        .action(ArgAction::SetTrue),
                ]),
        )
        .subcommand(
            Command::new("show")
                .about("Print one parsed post as JSON")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", sub)) => check(sub),
        Some(("index", sub)) => index(sub),
        Some(("show", sub)) => show(sub),
        _ => unreachable!("subcommand is required"),
    }
}
