//! `topic-groups`: run synthesis and edits against config files

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde_json::Value as JsonValue;
use tg_core::{
    PathMode, RecordingSink, RenderPass, TopicGroupsOptions, TopicGroupsPanel, TopicGroupsShell,
};
use tg_model::document::{parse_document, render_document};
use tg_model::{DocumentFormat, ObjectPath, PanelConfig, RuntimeInputs, TopicTaxonomy};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn input_args() -> [Arg; 4] {
    [
        Arg::new("config")
            .long("config")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Panel config (JSON or YAML)"),
        Arg::new("inputs")
            .long("inputs")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Runtime inputs: available topics, namespaces, transforms"),
        Arg::new("taxonomy")
            .long("taxonomy")
            .value_parser(value_parser!(PathBuf))
            .help("Topic taxonomy (optional)"),
        Arg::new("options")
            .long("options")
            .value_parser(value_parser!(PathBuf))
            .help("Panel options (optional)"),
    ]
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .value_parser(value_parser!(PathBuf))
        .help("Write the new config here instead of stdout")
}

fn cli() -> Command {
    Command::new("topic-groups")
        .version(tg_core::VERSION)
        .about("Topic group synthesis and path-based edits")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("synthesize")
                .about("Print the derived topic group tree")
                .args(input_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Write a value at a path and print the new config")
                .args(input_args())
                .arg(
                    Arg::new("path")
                        .long("path")
                        .required(true)
                        .value_parser(value_parser!(ObjectPath))
                        .help("Path such as [0].items[2].visible"),
                )
                .arg(
                    Arg::new("value")
                        .long("value")
                        .required(true)
                        .help("New value as JSON"),
                )
                .arg(
                    Arg::new("create-missing")
                        .long("create-missing")
                        .action(ArgAction::SetTrue)
                        .help("Create missing containers along the path"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("collapse")
                .about("Persist which groups are expanded")
                .args(input_args())
                .arg(
                    Arg::new("active")
                        .long("active")
                        .num_args(0..)
                        .action(ArgAction::Append)
                        .help("Ids of expanded groups"),
                )
                .arg(output_arg()),
        )
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_document(&text, format).with_context(|| format!("parsing {}", path.display()))
}

struct Session {
    config: PanelConfig,
    config_format: DocumentFormat,
    options: TopicGroupsOptions,
    pass: RenderPass,
}

impl Session {
    fn load(args: &ArgMatches) -> Result<Self> {
        let config_path = required_path(args, "config")?;
        let config_format = DocumentFormat::from_path(config_path)?;
        let text = fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config = PanelConfig::from_document(&text, config_format)
            .with_context(|| format!("parsing {}", config_path.display()))?;

        let inputs: RuntimeInputs = read_document(required_path(args, "inputs")?)?;
        let taxonomy = match args.get_one::<PathBuf>("taxonomy") {
            Some(path) => read_document(path)?,
            None => TopicTaxonomy::empty(),
        };
        let mut options = match args.get_one::<PathBuf>("options") {
            Some(path) => read_document(path)?,
            None => TopicGroupsOptions::default(),
        };
        if args.try_get_one::<bool>("create-missing").ok().flatten() == Some(&true) {
            options = options.with_path_mode(PathMode::CreateMissing);
        }

        let mut panel = TopicGroupsPanel::new(&taxonomy, options.clone());
        let pass = panel.render(&config.topic_groups, &inputs);
        tracing::info!(
            config = %config_path.display(),
            groups = pass.groups().len(),
            fingerprint = %pass.source().short(),
            "rendered topic groups"
        );

        Ok(Self {
            config,
            config_format,
            options,
            pass,
        })
    }

    fn shell(&self) -> TopicGroupsShell {
        TopicGroupsShell::new(self.config.pin_topics, &self.options)
    }

    fn finish(mut self, sink: &RecordingSink, args: &ArgMatches) -> Result<String> {
        sink.apply_all(&mut self.config);
        let format = match args.get_one::<PathBuf>("output") {
            Some(path) => DocumentFormat::from_path(path)?,
            None => self.config_format,
        };
        let rendered = render_document(&self.config, format)?;
        match args.get_one::<PathBuf>("output") {
            Some(path) => {
                fs::write(path, &rendered).with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(output = %path.display(), "wrote panel config");
                Ok(String::new())
            }
            None => Ok(rendered),
        }
    }
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    args.get_one::<PathBuf>(name)
        .with_context(|| format!("missing --{name}"))
}

fn synthesize(args: &ArgMatches) -> Result<String> {
    let session = Session::load(args)?;
    if args.get_flag("json") {
        return Ok(serde_json::to_string_pretty(session.pass.groups())?);
    }

    let mut out = String::new();
    for group in session.pass.groups() {
        writeln!(
            out,
            "{} {} [{}/{} available]{}",
            group.id(),
            group.group.display_name,
            group.derived_fields.available_item_count,
            group.items().len(),
            if group.group.expanded { " expanded" } else { "" }
        )?;
        for item in group.items() {
            write!(out, "  {} {} ({})", item.derived_fields.id, item.display_name(), item.item.topic_name)?;
            if !item.is_available() {
                out.push_str(" unavailable");
            }
            if !item.derived_fields.available_namespaces.is_empty() {
                write!(out, " namespaces: {}", item.derived_fields.available_namespaces.join(", "))?;
            }
            out.push('\n');
        }
    }
    Ok(out)
}

fn edit(args: &ArgMatches) -> Result<String> {
    let session = Session::load(args)?;
    let path = args
        .get_one::<ObjectPath>("path")
        .context("missing --path")?;
    let raw = args.get_one::<String>("value").context("missing --value")?;
    let value: JsonValue =
        serde_json::from_str(raw).with_context(|| format!("--value is not JSON: {raw}"))?;

    let mut sink = RecordingSink::new();
    session
        .shell()
        .on_topic_groups_change(&session.pass, path, value, &mut sink)
        .with_context(|| format!("editing {path}"))?;
    session.finish(&sink, args)
}

fn collapse(args: &ArgMatches) -> Result<String> {
    let session = Session::load(args)?;
    let active: Vec<&String> = args
        .get_many::<String>("active")
        .map(|values| values.collect())
        .unwrap_or_default();

    let mut sink = RecordingSink::new();
    session.shell().on_collapse_change(&session.pass, &active, &mut sink);
    session.finish(&sink, args)
}

fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("synthesize", args)) => synthesize(args),
        Some(("edit", args)) => edit(args),
        Some(("collapse", args)) => collapse(args),
        Some((other, _)) => anyhow::bail!("unknown command: {other}"),
        None => anyhow::bail!("no command given"),
    }
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));

    let output = run(&matches)?;
    if !output.is_empty() {
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
