use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{resolve_settings, OutputFormat, Overrides, Settings};
use crate::error::{DepsortError, Result};
use crate::graph::{ops, viz};
use crate::manifest::ManifestFormat;
use crate::resolver::DependencyResolver;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "depsort")]
#[command(about = "Installation order planner for package dependency graphs", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub manifest: Option<PathBuf>,
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_parser = parse_manifest_format)]
    pub manifest_format: Option<ManifestFormat>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Packages(JsonArgs),
    Order(OrderArgs),
    Install(InstallArgs),
    OrderAll(JsonArgs),
    MaxDeps(JsonArgs),
    Deps(DepsArgs),
    Dependents(DepsArgs),
    Show(ShowArgs),
    Check(JsonArgs),
}

#[derive(Args, Debug)]
pub struct JsonArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    pub package: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    pub package: String,
    #[arg(long)]
    pub installed: String,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DepsArgs {
    pub package: String,
    #[arg(long)]
    pub transitive: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub package: String,
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Serialize)]
struct MaxDepsJson {
    package: Option<String>,
    dependencies: usize,
}

struct Session {
    resolver: DependencyResolver,
    output: OutputFormat,
}

impl Session {
    fn json(&self, flag: bool) -> bool {
        flag || self.output == OutputFormat::Json
    }
}

pub fn run() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn parse_manifest_format(input: &str) -> std::result::Result<ManifestFormat, String> {
    input.parse()
}

fn dispatch(cli: Cli) -> Result<()> {
    output::configure(cli.verbose, cli.quiet, !cli.no_color);
    let settings = load_settings(&cli)?;
    output::configure(cli.verbose, cli.quiet, settings.color);
    let session = open_session(&settings)?;

    match cli.command {
        Commands::Packages(args) => handle_packages(args, &session),
        Commands::Order(args) => handle_order(args, &session),
        Commands::Install(args) => handle_install(args, &session),
        Commands::OrderAll(args) => handle_order_all(args, &session),
        Commands::MaxDeps(args) => handle_max_deps(args, &session),
        Commands::Deps(args) => handle_deps(args, &session),
        Commands::Dependents(args) => handle_dependents(args, &session),
        Commands::Show(args) => handle_show(args, &session),
        Commands::Check(args) => handle_check(args, &session),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = env::current_dir()?;
    let overrides = Overrides {
        config: cli.config.clone(),
        manifest: cli.manifest.clone(),
        manifest_format: cli.manifest_format,
        no_color: cli.no_color,
    };
    let settings = resolve_settings(&cwd, overrides)?;
    if let Some(path) = settings.config_path.as_ref() {
        output::debug(&format!("using config {}", path.display()));
    }
    Ok(settings)
}

fn open_session(settings: &Settings) -> Result<Session> {
    let manifest = settings.require_manifest()?;
    output::debug(&format!("reading manifest {}", manifest.display()));
    let resolver = DependencyResolver::from_manifest(manifest, settings.manifest_format)?;
    output::debug(&format!(
        "loaded {} packages and {} dependency edges",
        resolver.graph().order(),
        resolver.graph().size()
    ));
    Ok(Session {
        resolver,
        output: settings.output,
    })
}

fn handle_packages(args: JsonArgs, session: &Session) -> Result<()> {
    let packages: Vec<String> = session.resolver.all_packages().into_iter().collect();
    print_list(&packages, session.json(args.json))
}

fn handle_order(args: OrderArgs, session: &Session) -> Result<()> {
    let order = session.resolver.installation_order(&args.package)?;
    print_list(&order, session.json(args.json))
}

fn handle_install(args: InstallArgs, session: &Session) -> Result<()> {
    let order = session
        .resolver
        .incremental_install(&args.package, &args.installed)?;
    if order.is_empty() {
        output::info(&format!(
            "nothing to install: {} is covered by {}",
            args.package, args.installed
        ));
    }
    print_list(&order, session.json(args.json))
}

fn handle_order_all(args: JsonArgs, session: &Session) -> Result<()> {
    let order = session.resolver.installation_order_for_all()?;
    print_list(&order, session.json(args.json))
}

fn handle_max_deps(args: JsonArgs, session: &Session) -> Result<()> {
    let best = session.resolver.package_with_max_dependencies()?;
    let dependencies = match best.as_ref() {
        Some(pkg) => session.resolver.dependency_count(pkg.as_str())?,
        None => 0,
    };

    if session.json(args.json) {
        let json = MaxDepsJson {
            package: best.map(|pkg| pkg.into_string()),
            dependencies,
        };
        return print_json(&json);
    }

    match best {
        Some(pkg) => println!("{} ({} dependencies)", pkg, dependencies),
        None => output::warn("manifest declares no packages"),
    }
    Ok(())
}

fn handle_deps(args: DepsArgs, session: &Session) -> Result<()> {
    let deps: Vec<String> = if args.transitive {
        let mut order = session.resolver.installation_order(&args.package)?;
        order.pop();
        order
    } else {
        ensure_package(session, &args.package)?;
        session
            .resolver
            .graph()
            .adjacent_vertices_of(&args.package)
            .to_vec()
    };
    print_list(&deps, session.json(args.json))
}

fn handle_dependents(args: DepsArgs, session: &Session) -> Result<()> {
    ensure_package(session, &args.package)?;
    let graph = session.resolver.graph();
    let dependents = if args.transitive {
        ops::transitive_dependents(graph, &args.package)
    } else {
        ops::direct_dependents(graph, &args.package)
    };
    print_list(&dependents, session.json(args.json))
}

fn handle_show(args: ShowArgs, session: &Session) -> Result<()> {
    ensure_package(session, &args.package)?;
    let graph = session.resolver.graph();
    let rendered = match args.format.to_ascii_lowercase().as_str() {
        "tree" => viz::render_tree(graph, &args.package),
        "flat" => viz::render_flat(graph, &args.package),
        "dot" => viz::render_dot(graph, &args.package),
        other => {
            return Err(DepsortError::Other(anyhow::anyhow!(
                "unknown show format '{}'",
                other
            )))
        }
    };
    print!("{}", rendered);
    Ok(())
}

fn handle_check(args: JsonArgs, session: &Session) -> Result<()> {
    let cycles = ops::find_cycles(session.resolver.graph());
    if session.json(args.json) {
        print_json(&cycles)?;
    } else if cycles.is_empty() {
        output::info("no cycles found");
    } else {
        for cycle in &cycles {
            println!("{}", cycle.join(" -> "));
        }
    }

    if cycles.is_empty() {
        Ok(())
    } else {
        Err(DepsortError::Other(anyhow::anyhow!(
            "{} cycle(s) found in dependency graph",
            cycles.len()
        )))
    }
}

fn ensure_package(session: &Session, package: &str) -> Result<()> {
    session.resolver.require_package(package)?;
    Ok(())
}

fn print_list(items: &[String], json: bool) -> Result<()> {
    if json {
        return print_json(&items);
    }
    for item in items {
        println!("{}", item);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| DepsortError::Other(anyhow::Error::new(err)))?;
    println!("{}", rendered);
    Ok(())
}
