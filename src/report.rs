//! Line-oriented text output for events and query results

use std::io::{self, Write};

use crate::config::Config;
use crate::event::{Event, Member};

/// Writes one line per event or query result
pub struct Reporter<'c, W: Write> {
    out: W,
    config: &'c Config,
}

impl<'c, W: Write> Reporter<'c, W> {
    pub fn new(out: W, config: &'c Config) -> Self {
        Reporter { out, config }
    }

    pub fn event(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Welcomed { ancestor, newcomer } => {
                writeln!(self.out, "{} welcomed {}", ancestor, newcomer)
            }
            Event::Replaced {
                departing,
                replacement,
            } => writeln!(
                self.out,
                "{} left the family, replaced by {}",
                departing,
                replacement.as_deref().unwrap_or(self.config.vacancy_label())
            ),
        }
    }

    pub fn events<'e>(&mut self, events: impl IntoIterator<Item = &'e Event>) -> io::Result<()> {
        for event in events {
            self.event(event)?;
        }
        Ok(())
    }

    pub fn target(&mut self, ancestor: &Member) -> io::Result<()> {
        write!(self.out, "Target Analysis Result:")?;
        self.member(ancestor)?;
        writeln!(self.out)
    }

    pub fn division(&mut self, count: usize) -> io::Result<()> {
        writeln!(self.out, "Division Analysis Result: {}", count)
    }

    pub fn rank(&mut self, peers: &[Member]) -> io::Result<()> {
        write!(self.out, "Rank Analysis Result:")?;
        for peer in peers {
            self.member(peer)?;
        }
        writeln!(self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn member(&mut self, member: &Member) -> io::Result<()> {
        write!(
            self.out,
            " {} {:.*}",
            member.label,
            self.config.precision(),
            member.key
        )
    }
}
