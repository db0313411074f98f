//! Minimal CLI: definition → (resolve | list)
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use route_gen::{Resolved, RouteFile, RouteTemplate, Segment};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate paths from a declarative JSON route definition
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more logging on stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// walk the route tree step by step and print the resulting path
    Resolve(ResolveOut),
    /// list every path template a definition can produce
    List(ListOut),
}

#[derive(Args, Debug, Clone)]
struct ResolveOut {
    /// route definition (.json)
    #[arg(long, short)]
    spec: PathBuf,

    /// steps from the root: `key` for collections, `key=id` for members.
    /// The first `=` splits key from id, so keys cannot contain `=`; ids can
    #[arg(required = true)]
    steps: Vec<Step>,
}

#[derive(Args, Debug, Clone)]
struct ListOut {
    /// One or more definitions. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// emit JSON instead of the human-readable listing
    #[arg(long, default_value_t = false)]
    json: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// One invocation: a route key, plus an identifier for members.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    key: String,
    id: Option<Segment>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl FromStr for Step {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, id) = match s.split_once('=') {
            Some((key, id)) => (key, id.parse::<Segment>().ok()),
            None => (s, None),
        };
        if key.is_empty() {
            return Err(format!("empty route key in step `{s}`"))
        }
        Ok(Self { key: key.to_string(), id })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Resolve(target) => {
                let file = RouteFile::load(&target.spec)?;
                let path = resolve_steps(file, &target.steps)?;
                println!("{path}");
            }
            Command::List(target) => {
                let source_paths = resolve_file_path_patterns(&target.input)
                    .context("failed to resolve input file paths")?;
                let mut listing = Vec::<(PathBuf, Vec<RouteTemplate>)>::new();
                for source_path in source_paths {
                    let file = RouteFile::load(&source_path)?;
                    listing.push((source_path, file.templates()));
                }
                let out_src = if target.json {
                    let entries = listing
                        .iter()
                        .map(|(path, templates)| serde_json::json!({
                            "file": path.to_string_lossy(),
                            "templates": templates,
                        }))
                        .collect::<Vec<_>>();
                    serde_json::to_string_pretty(&entries)?
                } else {
                    render_listing(&listing, target.out.is_none())
                };
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("failed to create {}", parent.display()))?;
                    }
                    std::fs::write(out, &out_src)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                } else {
                    println!("{out_src}");
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_steps(file: RouteFile, steps: &[Step]) -> Result<String> {
    let mut current = Resolved::Routes(file.bind());
    for step in steps {
        tracing::debug!(key = %step.key, id = ?step.id, "resolving step");
        current = current
            .invoke(&step.key, step.id.clone())
            .with_context(|| format!("failed at step `{}`", step.key))?;
    }
    Ok(current.render()?)
}

fn render_listing(listing: &[(PathBuf, Vec<RouteTemplate>)], colorize: bool) -> String {
    let mut out = String::new();
    for (source_path, templates) in listing {
        let header = source_path.to_string_lossy().to_string();
        if colorize {
            out.push_str(&format!("{}\n", header.bold()));
        } else {
            out.push_str(&format!("{header}\n"));
        }
        for template in templates {
            let line = match (template.renderable, colorize) {
                (true, true) => format!("  {}", template.path.green()),
                (true, false) => format!("  {}", template.path),
                (false, true) => format!("  {} {}", template.path.dimmed(), "(render denied)".dimmed()),
                (false, false) => format!("  {} (render denied)", template.path),
            };
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
