//! Interpreter for line-oriented command scripts
//!
//! The first non-blank line names the root member: `<label> <rank>`. Every later line is one
//! whitespace-separated command:
//!
//! | command                                        | effect                     |
//! |------------------------------------------------|----------------------------|
//! | `MEMBER_IN <label> <rank>`                     | insert                     |
//! | `MEMBER_OUT <label> <rank>`                    | remove (label unused)      |
//! | `INTEL_TARGET <label> <rank> <label> <rank>`   | lowest common ancestor     |
//! | `INTEL_DIVIDE`                                 | division analysis          |
//! | `INTEL_RANK <label> <rank>`                    | members at the same depth  |

use std::io::{BufRead, Write};

use tracing::{debug, info, instrument, warn};

use crate::avl::AvlTree;
use crate::config::Config;
use crate::error::{ScriptError, TreeError};
use crate::rank::Rank;
use crate::report::Reporter;

const MEMBER_IN: &str = "MEMBER_IN";
const MEMBER_OUT: &str = "MEMBER_OUT";
const INTEL_TARGET: &str = "INTEL_TARGET";
const INTEL_DIVIDE: &str = "INTEL_DIVIDE";
const INTEL_RANK: &str = "INTEL_RANK";

/// One parsed script line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    MemberIn { label: String, rank: Rank },
    MemberOut { rank: Rank },
    Target { first: Rank, second: Rank },
    Divide,
    MonitorRank { rank: Rank },
}

impl Command {
    /// Parse line number `line` of a script; blank lines yield `Ok(None)`
    pub fn parse(line: usize, text: &str) -> Result<Option<Command>, ScriptError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let Some(&word) = tokens.first() else {
            return Ok(None);
        };
        let fields = Fields {
            tokens: &tokens,
            line,
        };
        let command = match word {
            MEMBER_IN => Command::MemberIn {
                label: fields.text(1, MEMBER_IN, "label")?.to_string(),
                rank: fields.rank(2, MEMBER_IN)?,
            },
            MEMBER_OUT => Command::MemberOut {
                rank: fields.rank(2, MEMBER_OUT)?,
            },
            INTEL_TARGET => Command::Target {
                first: fields.rank(2, INTEL_TARGET)?,
                second: fields.rank(4, INTEL_TARGET)?,
            },
            INTEL_DIVIDE => Command::Divide,
            INTEL_RANK => Command::MonitorRank {
                rank: fields.rank(2, INTEL_RANK)?,
            },
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    word: word.to_string(),
                })
            }
        };
        Ok(Some(command))
    }
}

struct Fields<'a> {
    tokens: &'a [&'a str],
    line: usize,
}

impl<'a> Fields<'a> {
    fn text(
        &self,
        index: usize,
        command: &'static str,
        field: &'static str,
    ) -> Result<&'a str, ScriptError> {
        self.tokens
            .get(index)
            .copied()
            .ok_or(ScriptError::MissingField {
                line: self.line,
                command,
                field,
            })
    }

    fn rank(&self, index: usize, command: &'static str) -> Result<Rank, ScriptError> {
        let value = self.text(index, command, "rank")?;
        value.parse().map_err(|source| ScriptError::InvalidRank {
            line: self.line,
            value: value.to_string(),
            source,
        })
    }
}

/// What a finished run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed after the root line
    pub executed: usize,
    /// Lines skipped because of unknown commands or failed queries
    pub skipped: usize,
    /// Members left in the hierarchy
    pub members: usize,
}

/// Execute a whole script, writing one line per event or query result to `output`
///
/// Unknown commands and failing queries are logged and skipped unless the configuration is
/// strict. Malformed lines and I/O failures always abort the run.
#[instrument(level = "debug", skip_all)]
pub fn run<R: BufRead, W: Write>(input: R, output: W, config: &Config) -> Result<RunSummary, ScriptError> {
    let mut tree = AvlTree::new();
    let mut reporter = Reporter::new(output, config);
    let mut summary = RunSummary::default();
    let mut lines = input.lines().enumerate().map(|(index, text)| (index + 1, text));

    loop {
        let Some((line, text)) = lines.next() else {
            return Err(ScriptError::MissingRoot);
        };
        let text = text?;
        if text.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let fields = Fields {
            tokens: &tokens,
            line,
        };
        let label = fields.text(0, "root", "label")?;
        let rank = fields.rank(1, "root")?;
        info!(%label, %rank, "root");
        reporter.events(tree.insert(rank, label).events())?;
        break;
    }

    for (line, text) in lines {
        let text = text?;
        let result = match Command::parse(line, &text) {
            Ok(None) => continue,
            Ok(Some(command)) => execute(&mut tree, command, line, &mut reporter),
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => summary.executed += 1,
            Err(err) if err.is_skippable() && !config.strict() => {
                warn!(%err, "skipping line");
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    reporter.flush()?;
    summary.members = tree.len();
    info!(?summary, "script finished");
    Ok(summary)
}

fn execute<W: Write>(
    tree: &mut AvlTree,
    command: Command,
    line: usize,
    reporter: &mut Reporter<'_, W>,
) -> Result<(), ScriptError> {
    debug!(line, ?command, "execute");
    let query = |source: TreeError| ScriptError::Query { line, source };
    match command {
        Command::MemberIn { label, rank } => reporter.events(tree.insert(rank, label).events())?,
        Command::MemberOut { rank } => reporter.events(tree.remove(rank).events())?,
        Command::Target { first, second } => {
            if let Some(ancestor) = tree.lowest_common_ancestor(first, second).map_err(query)? {
                reporter.target(&ancestor)?;
            }
        }
        Command::Divide => reporter.division(tree.divide().map_err(query)?)?,
        Command::MonitorRank { rank } => reporter.rank(&tree.monitor_rank(rank).map_err(query)?)?,
    }
    Ok(())
}
