//! Classification of single, trimmed VCD lines.

use super::body::parse_change;
use crate::data::WaveValue;

use regex::Regex;
use std::sync::OnceLock;

/// Header blocks whose payload follows on the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Block {
    Date,
    Version,
    Timescale,
    Comment,
}

impl Block {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "date" => Some(Block::Date),
            "version" => Some(Block::Version),
            "timescale" => Some(Block::Timescale),
            "comment" => Some(Block::Comment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct VarDecl<'a> {
    pub var_type: &'a str,
    pub size: u32,
    pub alias: &'a str,
    pub name: &'a str,
    pub msb: Option<i64>,
    pub lsb: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Line<'a> {
    /// `$date`, `$version`, `$timescale` or `$comment` on its own
    Begin(Block),
    /// Block with payload and `$end` on the same line
    Inline(Block, &'a str),
    /// Block with payload on the keyword line, `$end` follows later
    Open(Block, &'a str),
    End,
    Scope(&'a str),
    Upscope,
    Var(VarDecl<'a>),
    EndDefinitions,
    Timestamp(u64),
    Change(&'a str, WaveValue),
    /// `$dumpvars`, `$dumpall`, `$dumpon`, `$dumpoff`
    Dump,
    Unknown,
}

struct Patterns {
    inline: Regex,
    open: Regex,
    scope: Regex,
    upscope: Regex,
    var: Regex,
    enddefinitions: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |p: &str| Regex::new(p).expect("line pattern is valid");

        Patterns {
            inline: re(r"^\$(date|version|timescale|comment)\s+(.*?)\s*\$end$"),
            open: re(r"^\$(date|version|timescale)\s+(.*\S)$"),
            scope: re(r"^\$scope\s+\S+\s+([^$\s]\S*)(?:\s+\$end)?$"),
            upscope: re(r"^\$upscope(?:\s+\$end)?$"),
            var: re(r"^\$var\s+(\S+)\s+(\d+)\s+(\S+)\s+(\S+?)(?:\s*\[\s*(-?\d+)\s*(?::\s*(-?\d+)\s*)?\])?(?:\s+\$end)?$"),
            enddefinitions: re(r"^\$enddefinitions(?:\s+\$end)?$"),
        }
    })
}

fn classify_keyword(line: &str) -> Line<'_> {
    let pats = patterns();

    if line == "$end" {
        return Line::End;
    }

    if let Some(block) = Block::from_keyword(&line[1..]) {
        return Line::Begin(block);
    }

    if let Some(caps) = pats.inline.captures(line) {
        if let (Some(block), Some(payload)) = (
            caps.get(1).and_then(|m| Block::from_keyword(m.as_str())),
            caps.get(2),
        ) {
            return Line::Inline(block, payload.as_str());
        }
    }

    if let Some(caps) = pats.open.captures(line) {
        if let (Some(block), Some(payload)) = (
            caps.get(1).and_then(|m| Block::from_keyword(m.as_str())),
            caps.get(2),
        ) {
            return Line::Open(block, payload.as_str());
        }
    }

    // multi-line comment starting with text on the keyword line
    if line.starts_with("$comment") {
        return Line::Begin(Block::Comment);
    }

    if let Some(caps) = pats.scope.captures(line) {
        if let Some(name) = caps.get(1) {
            return Line::Scope(name.as_str());
        }
    }

    if pats.upscope.is_match(line) {
        return Line::Upscope;
    }

    if let Some(caps) = pats.var.captures(line) {
        return match var_decl(&caps) {
            Some(decl) => Line::Var(decl),
            None => Line::Unknown,
        };
    }

    if pats.enddefinitions.is_match(line) {
        return Line::EndDefinitions;
    }

    if ["$dumpvars", "$dumpall", "$dumpon", "$dumpoff"].iter().any(|k| line.starts_with(k)) {
        return Line::Dump;
    }

    Line::Unknown
}

fn var_decl<'a>(caps: &regex::Captures<'a>) -> Option<VarDecl<'a>> {
    let bound = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i64>().ok());

    let msb = bound(5);
    // a single index `[3]` is both bounds
    let lsb = bound(6).or(msb);

    Some(VarDecl {
        var_type: caps.get(1)?.as_str(),
        size: caps.get(2)?.as_str().parse().ok().filter(|s| *s > 0)?,
        alias: caps.get(3)?.as_str(),
        name: caps.get(4)?.as_str(),
        msb,
        lsb,
    })
}

/// Classify a trimmed, non-empty line.
pub(super) fn classify(line: &str) -> Line<'_> {
    if line.starts_with('$') {
        classify_keyword(line)
    } else if let Some(tick) = line.strip_prefix('#') {
        match tick.trim().parse() {
            Ok(tick) => Line::Timestamp(tick),
            Err(_) => Line::Unknown,
        }
    } else {
        match parse_change(line) {
            Some((alias, value)) => Line::Change(alias, value),
            None => Line::Unknown,
        }
    }
}
