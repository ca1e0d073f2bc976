//! pluck: descendant-selector queries over HTML documents.
//!
//! Run with: cargo run --bin pluck -- [OPTIONS] <SELECTOR>...
//!
//! Examples:
//! - pluck -f page.html "div a img"          # List matching elements
//! - pluck --html '<p><a>x</a></p>' -c "p a" # Count matches
//! - curl -s URL | pluck --json "a"          # Matches from stdin as JSON

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use pluck_common::{Level, Verbosity};
use pluck_dom::{DomTree, NodeId};
use pluck_html::{Document, format_tree, parse_document};
use pluck_select::{Matcher, OutlineSink, TraceEvent, TraceSink, TracingSink};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// pluck: find elements in HTML with descendant selector chains
#[derive(Parser, Debug)]
#[command(name = "pluck")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"SELECTORS:
    Each selector is a chain of tag[#id][.class] heads separated by
    whitespace. Every head may match at any depth below the previous one.
    Class and id compare against the whole attribute value.

EXAMPLES:
    # Images inside links inside divs
    pluck -f page.html "div a img"

    # Two chains at once; each element is listed once
    pluck -f page.html "div#main a" "footer a"

    # Narrate the traversal
    pluck -f page.html -v trace "div a"
    pluck -f page.html --outline node.log "div a"
"#)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Selector chains, e.g. "div a img"
    #[arg(value_name = "SELECTOR", required = true)]
    selectors: Vec<String>,

    /// HTML file to query (reads stdin when neither --file nor --html is given)
    #[arg(short, long, value_name = "FILE", conflicts_with = "html")]
    file: Option<PathBuf>,

    /// Inline HTML markup to query
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Diagnostic verbosity: -3 (fatal only) to 3 (trace), or a level name
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    verbosity: Verbosity,

    /// Print matches as a JSON array
    #[arg(long, conflicts_with = "count")]
    json: bool,

    /// Print each match's text content
    #[arg(short, long)]
    text: bool,

    /// Print only the number of matches
    #[arg(short, long)]
    count: bool,

    /// Write an indented outline of the traversal to FILE
    #[arg(long, value_name = "FILE")]
    outline: Option<PathBuf>,

    /// Print the parsed tree before the matches
    #[arg(long)]
    tree: bool,
}

/// One match in `--json` output.
#[derive(Serialize)]
struct MatchRecord {
    node: usize,
    tag: String,
    attributes: Vec<AttributeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
struct AttributeRecord {
    name: String,
    value: String,
}

/// Sends every event to two sinks.
struct Tee<'a> {
    first: &'a dyn TraceSink,
    second: &'a dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn enabled(&self, level: Level) -> bool {
        self.first.enabled(level) || self.second.enabled(level)
    }

    fn record(&self, event: &TraceEvent<'_>) {
        for sink in [self.first, self.second] {
            if sink.enabled(event.level()) {
                sink.record(event);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let doc = load_doc(&cli)?;
    for issue in &doc.issues {
        tracing::debug!(offset = issue.offset, "markup: {}", issue.message);
    }

    if cli.tree {
        println!("=== DOM Tree ===");
        print!("{}", format_tree(&doc.tree, doc.tree.root()));
        println!();
    }

    let found = run_query(&cli, &doc.tree)?;
    tracing::info!(matches = found.len(), "query complete");

    if cli.count {
        println!("{}", found.len());
    } else if cli.json {
        print_json(&doc.tree, &found, cli.text)?;
    } else {
        print_matches(&doc.tree, &found, cli.text);
    }
    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbosity`.
fn init_tracing(verbosity: Verbosity) {
    let fallback = match verbosity.max_level() {
        Level::Trace => "trace",
        Level::Debug | Level::Verbose => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        Level::Error | Level::Fatal => "error",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the document from `--html`, `--file` or stdin.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
fn load_doc(cli: &Cli) -> anyhow::Result<Document> {
    if let Some(ref html) = cli.html {
        return Ok(parse_document(html));
    }
    let bytes = if let Some(ref path) = cli.file {
        if !path.exists() {
            bail!("no such file: {}", path.display());
        }
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        let mut bytes = Vec::new();
        let _ = io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read markup from stdin")?;
        bytes
    };
    Ok(parse_document(&String::from_utf8_lossy(&bytes)))
}

fn run_query(cli: &Cli, tree: &DomTree) -> anyhow::Result<Vec<NodeId>> {
    let tracing_sink = TracingSink::new(cli.verbosity);

    let Some(ref outline_path) = cli.outline else {
        return Matcher::with_sink(&tracing_sink)
            .find(tree, Some(tree.root()), &cli.selectors)
            .context("query failed");
    };

    let file = File::create(outline_path)
        .with_context(|| format!("failed to create {}", outline_path.display()))?;
    let outline = OutlineSink::new(BufWriter::new(file));
    let result = Matcher::with_sink(&Tee {
        first: &tracing_sink,
        second: &outline,
    })
    .find(tree, Some(tree.root()), &cli.selectors);
    let _ = outline
        .finish()
        .with_context(|| format!("failed to write {}", outline_path.display()))?;
    result.context("query failed")
}

fn print_matches(tree: &DomTree, found: &[NodeId], with_text: bool) {
    let color = io::stdout().is_terminal();
    for &id in found {
        let label = tree.label(id).to_string();
        if color {
            println!("{}", label.cyan());
        } else {
            println!("{label}");
        }
        if with_text {
            let text = tree.text_content(id);
            let text = text.trim();
            if !text.is_empty() {
                if color {
                    println!("  {}", text.dimmed());
                } else {
                    println!("  {text}");
                }
            }
        }
    }
    if color {
        eprintln!("{}", format!("{} match(es)", found.len()).bold());
    }
}

fn print_json(tree: &DomTree, found: &[NodeId], with_text: bool) -> anyhow::Result<()> {
    let records = match_records(tree, found, with_text);
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// One record per matched element.
fn match_records(tree: &DomTree, found: &[NodeId], with_text: bool) -> Vec<MatchRecord> {
    found
        .iter()
        .filter_map(|&id| {
            let element = tree.as_element(id)?;
            Some(MatchRecord {
                node: id.0,
                tag: element.tag_name.clone(),
                attributes: element
                    .attrs
                    .iter()
                    .map(|attr| AttributeRecord {
                        name: attr.name.clone(),
                        value: attr.value.clone(),
                    })
                    .collect(),
                text: with_text.then(|| tree.text_content(id)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pluck_select::FindError;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pluck").chain(args.iter().copied())).unwrap()
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pluck-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_verbosity_accepts_numbers_and_names() {
        assert_eq!(cli(&["-v", "-3", "div"]).verbosity.value(), -3);
        assert_eq!(cli(&["-v", "trace", "div"]).verbosity, Verbosity::at(Level::Trace));
        assert_eq!(cli(&["div"]).verbosity, Verbosity::default());
        assert!(Cli::try_parse_from(["pluck", "-v", "4", "div"]).is_err());
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        assert!(Cli::try_parse_from(["pluck", "--json", "-c", "div"]).is_err());
        assert!(Cli::try_parse_from(["pluck", "-f", "a.html", "--html", "<p>", "p"]).is_err());
        assert!(Cli::try_parse_from(["pluck"]).is_err());
    }

    #[test]
    fn test_missing_file_bails() {
        let missing = scratch("missing.html");
        let args = cli(&["-f", missing.to_str().unwrap(), "div"]);
        let err = load_doc(&args).unwrap_err();
        assert!(err.to_string().starts_with("no such file"));
    }

    #[test]
    fn test_query_over_inline_html() {
        let args = cli(&["--html", "<div><a></a><p><a></a></p></div><a></a>", "div a", "p a"]);
        let doc = load_doc(&args).unwrap();
        let found = run_query(&args, &doc.tree).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let args = cli(&["--html", "<div><a></a></div>", "div >"]);
        let doc = load_doc(&args).unwrap();
        let err = run_query(&args, &doc.tree).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FindError>(),
            Some(FindError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_outline_is_written() {
        let path = scratch("outline.log");
        let args = cli(&[
            "--html",
            "<div><a></a></div>",
            "--outline",
            path.to_str().unwrap(),
            "div a",
        ]);
        let doc = load_doc(&args).unwrap();
        assert_eq!(run_query(&args, &doc.tree).unwrap().len(), 1);
        let outline = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            outline,
            "Skipping \"Document\"\n  <div>\n    <a>\n    </a>\n  </div>\n"
        );
    }

    #[test]
    fn test_non_utf8_file_is_decoded_lossily() {
        let path = scratch("latin1.html");
        fs::write(&path, b"<p class=\"caf\xE9\">ok</p>").unwrap();
        let args = cli(&["-f", path.to_str().unwrap(), "p"]);
        let doc = load_doc(&args);
        fs::remove_file(&path).unwrap();
        let doc = doc.unwrap();
        let found = run_query(&args, &doc.tree).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(doc.tree.attribute(found[0], "class"), Some("caf\u{FFFD}"));
    }

    #[test]
    fn test_match_records_shape() {
        let args = cli(&["--html", r#"<p><a href="/x" class="c">go</a></p>"#, "a"]);
        let doc = load_doc(&args).unwrap();
        let found = run_query(&args, &doc.tree).unwrap();

        let bare = serde_json::to_value(match_records(&doc.tree, &found, false)).unwrap();
        assert_eq!(
            bare,
            serde_json::json!([{
                "node": found[0].0,
                "tag": "a",
                "attributes": [
                    {"name": "href", "value": "/x"},
                    {"name": "class", "value": "c"},
                ],
            }])
        );

        let with_text = serde_json::to_value(match_records(&doc.tree, &found, true)).unwrap();
        assert_eq!(with_text[0]["text"], "go");
    }
}
