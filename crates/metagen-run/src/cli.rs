use clap::{Parser, Subcommand};
use metagen::{
    EmitterConfig, FormatterConfig, LineEnding, LocalFsTemplateResolver, Session, TemplateLoader,
};
use miette::IntoDiagnostic;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::plan::Plan;
use crate::templates;

#[derive(Parser, Debug, Default)]
#[command(name = "metagen")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
    ## To run a generation plan:\n\
    metagen plans/products.toml\n\n\
    ## To write the generated source to a file:\n\
    metagen plans/products.toml -o Products.g.cs\n\n\
    ## To override bundled templates from a directory:\n\
    metagen -L ./templates plans/products.toml\n\n\
    ## To list bundled templates and their rules:\n\
    metagen templates")]
#[command(
    about = "metagen rewrites C# template declarations into generated source.",
    long_about = None
)]
pub struct Cli {
    #[clap(subcommand)]
    commands: Option<Commands>,

    /// Search templates from the directory
    #[arg(short = 'L', long = "directory")]
    template_directories: Vec<PathBuf>,

    #[clap(flatten)]
    output: OutputArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// TOML file listing the start, broadcast and complete steps
    #[arg(value_name = "PLAN")]
    plan: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, clap::ValueEnum)]
enum LineEndingArg {
    #[default]
    Native,
    Lf,
    Crlf,
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::Native => LineEnding::Native,
            LineEndingArg::Lf => LineEnding::Lf,
            LineEndingArg::Crlf => LineEnding::CrLf,
        }
    }
}

#[derive(Clone, Debug, clap::Args, Default)]
struct OutputArgs {
    /// Output to the specified file, replacing it if it exists
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// Number of spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent_width: usize,

    /// Line separator of the generated source
    #[arg(long, value_enum, default_value_t)]
    line_ending: LineEndingArg,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List bundled templates with their rule signatures
    Templates,
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        self.init_tracing();

        match &self.commands {
            Some(Commands::Templates) => self.list_templates(),
            None => match &self.plan {
                Some(plan) => self.run_plan(plan),
                None => Err(miette::miette!(
                    help = "Pass a plan file, e.g. `metagen plans/products.toml`.",
                    "No plan file given"
                )),
            },
        }
    }

    fn init_tracing(&self) {
        let filter = match self.verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("metagen=info,metagen_run=info")),
            1 => EnvFilter::new("metagen=debug,metagen_run=debug"),
            _ => EnvFilter::new("metagen=trace,metagen_run=trace"),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .without_time()
            .try_init();
    }

    fn list_templates(&self) -> miette::Result<()> {
        let registry = templates::registry();
        let stdout = io::stdout();
        let mut handle = BufWriter::new(stdout.lock());

        for id in templates::ids() {
            writeln!(handle, "{}", id).into_diagnostic()?;
            for rule in registry.get(id).into_iter().flat_map(|rules| rules.iter()) {
                writeln!(handle, "  {}", rule.signature()).into_diagnostic()?;
            }
        }

        handle.flush().into_diagnostic()
    }

    fn session(&self) -> Session {
        let (resolver, embedded) = if self.template_directories.is_empty() {
            (LocalFsTemplateResolver::default(), templates::embedded())
        } else {
            let resolver = LocalFsTemplateResolver::new(Some(self.template_directories.clone()));
            let embedded = templates::embedded_except(&resolver);
            (resolver, embedded)
        };

        Session::with_config(
            TemplateLoader::new(resolver, templates::registry()).with_embedded(embedded),
            EmitterConfig {
                formatter: FormatterConfig {
                    indent_width: self.output.indent_width,
                    line_ending: self.output.line_ending.clone().into(),
                },
            },
        )
    }

    fn run_plan(&self, path: &Path) -> miette::Result<()> {
        let content = fs::read_to_string(path).into_diagnostic()?;
        let plan = Plan::from_str(&content)?;
        let mut session = self.session();

        plan.run(&mut session)?;

        if session.pending() > 0 {
            tracing::warn!(pending = session.pending(), "Plan finished with open builders");
        }

        let rendered = session.render_to_string();

        match &self.output.output_file {
            Some(output_file) => {
                if output_file.exists() {
                    fs::remove_file(output_file).into_diagnostic()?;
                }
                fs::write(output_file, rendered).into_diagnostic()?;
                tracing::info!(path = %output_file.display(), "Generated source written");
            }
            None => {
                let stdout = io::stdout();
                let mut handle = BufWriter::new(stdout.lock());
                handle.write_all(rendered.as_bytes()).into_diagnostic()?;
                handle.flush().into_diagnostic()?;
            }
        }

        Ok(())
    }
}
