mod body;
mod line;

use crate::data::*;
use crate::error::*;
use body::push_wave;
use line::{Block, Line, VarDecl};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

/// A declared variable together with the scope path it was declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub modules: Vec<String>,
    pub variable: VcdVariable,
}

/// Flat result of reading a VCD file, before the module tree is built.
#[derive(Debug, Clone, PartialEq)]
pub struct VcdFile {
    pub signals: Vec<Signal>,
    /// Every opened scope path, in order of first appearance.
    pub scopes: Vec<Vec<String>>,
    pub date: Option<DateTime<Utc>>,
    pub version: Option<String>,
    pub timescale: f64,
}

struct Parser {
    /// Header block waiting for its payload line
    pending: Option<Block>,
    stack: Vec<String>,
    signals: Vec<Signal>,
    scopes: Vec<Vec<String>>,
    aliases: HashMap<String, Vec<usize>>,
    date: Option<DateTime<Utc>>,
    version: Option<String>,
    timescale: Option<f64>,
    in_body: bool,
    tick: u64,
}

impl Parser {
    fn new() -> Self {
        Self {
            pending: None,
            stack: vec![],
            signals: vec![],
            scopes: vec![],
            aliases: HashMap::new(),
            date: None,
            version: None,
            timescale: None,
            in_body: false,
            tick: 0,
        }
    }

    fn feed(&mut self, text: &str) {
        let line = line::classify(text);

        if line == Line::End {
            self.pending = None;
            return;
        }

        match self.pending {
            Some(Block::Comment) => {
                if text.ends_with("$end") {
                    self.pending = None;
                }
                return;
            }
            Some(block) => {
                self.pending = None;
                let payload = text.strip_suffix("$end").unwrap_or(text).trim_end();
                self.payload(block, payload);
                return;
            }
            None => (),
        }

        match line {
            Line::Begin(block) => self.pending = Some(block),
            Line::Inline(block, payload) | Line::Open(block, payload) => self.payload(block, payload),
            Line::Scope(name) => self.open_scope(name),
            Line::Upscope => {
                self.stack.pop();
            }
            Line::Var(decl) => self.declare(decl),
            Line::EndDefinitions => self.in_body = true,
            Line::Timestamp(tick) => {
                self.in_body = true;
                self.tick = tick;
            }
            Line::Change(alias, value) => {
                if self.in_body {
                    self.change(alias, value);
                }
            }
            Line::End | Line::Dump | Line::Unknown => (),
        }
    }

    fn payload(&mut self, block: Block, text: &str) {
        match block {
            Block::Date => self.date = parse_date(text),
            Block::Version => self.version = Some(text.to_string()),
            Block::Timescale => {
                if let Some(timescale) = parse_timescale(text) {
                    self.timescale = Some(timescale);
                }
            }
            Block::Comment => (),
        }
    }

    fn open_scope(&mut self, name: &str) {
        self.stack.push(name.to_string());

        if !self.scopes.contains(&self.stack) {
            self.scopes.push(self.stack.clone());
        }
    }

    fn declare(&mut self, decl: VarDecl<'_>) {
        let id = self.signals.len();
        let mut variable = VcdVariable::new(id, decl.name, decl.alias, decl.var_type, decl.size);
        variable.msb = decl.msb;
        variable.lsb = decl.lsb;

        let sharing = self.aliases.entry(decl.alias.to_string()).or_default();
        sharing.push(id);
        if sharing.len() == 2 {
            warn!(
                "Alias '{}' is shared by '{}' and '{}', both receive the same value changes",
                decl.alias, self.signals[sharing[0]].variable.name, decl.name
            );
        }

        self.signals.push(Signal {
            modules: self.stack.clone(),
            variable,
        });
    }

    fn change(&mut self, alias: &str, value: WaveValue) {
        if let Some(indices) = self.aliases.get(alias) {
            for i in indices.iter() {
                push_wave(&mut self.signals[*i].variable.waves, self.tick, value.clone());
            }
        }
    }

    fn finish(self) -> Option<VcdFile> {
        let timescale = self.timescale?;

        Some(VcdFile {
            signals: self.signals,
            scopes: self.scopes,
            date: self.date,
            version: self.version,
            timescale,
        })
    }
}

/// Interpret a `$date` payload. Times without a zone are taken as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    const LAYOUTS: [&str; 3] = ["%a %b %e %H:%M:%S %Y", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    for layout in LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Read VCD text into its flat form.
///
/// Lines that match nothing are skipped. Returns `None` if no timescale was found.
pub fn parse_file(text: &str) -> Option<VcdFile> {
    let mut parser = Parser::new();

    for line in text.lines() {
        let line = line.trim();
        if !line.is_empty() {
            parser.feed(line);
        }
    }

    parser.finish()
}

/// Read VCD text into a document. Returns `None` if no timescale was found.
pub fn parse(text: &str) -> Option<Vcd> {
    let vcd = parse_file(text)?.into_vcd();

    info!(
        "Decoded {} variables, timescale {}",
        flatten_variables(&vcd.root_module).len(),
        timescale_to_string(vcd.timescale)
    );

    Some(vcd)
}

/// Read a VCD file from disk.
pub fn load_file(filename: impl AsRef<Path>) -> Result<Vcd> {
    let filename = filename.as_ref();
    let text = std::fs::read_to_string(filename)?;

    parse(&text).ok_or_else(|| Error::NotVcd(filename.display().to_string()))
}

#[derive(Default)]
struct ModuleBuilder {
    name: String,
    variables: Vec<VcdVariable>,
    submodules: Vec<ModuleBuilder>,
}

impl ModuleBuilder {
    fn node_at(&mut self, path: &[String]) -> &mut ModuleBuilder {
        let mut node = self;

        for name in path {
            let pos = match node.submodules.iter().position(|m| m.name == *name) {
                Some(pos) => pos,
                None => {
                    node.submodules.push(ModuleBuilder {
                        name: name.clone(),
                        ..Default::default()
                    });
                    node.submodules.len() - 1
                }
            };
            node = &mut node.submodules[pos];
        }

        node
    }

    fn build(self) -> VcdModule {
        VcdModule {
            name: self.name,
            variables: self.variables.into_iter().map(Rc::new).collect(),
            submodules: self.submodules.into_iter().map(|m| Rc::new(m.build())).collect(),
        }
    }
}

impl VcdFile {
    /// Fold the flat signal list into the module tree.
    pub fn into_vcd(self) -> Vcd {
        let mut root = ModuleBuilder::default();

        for path in self.scopes.iter() {
            root.node_at(path);
        }

        for signal in self.signals {
            root.node_at(&signal.modules).variables.push(signal.variable);
        }

        Vcd {
            date: self.date,
            version: self.version,
            timescale: self.timescale,
            root_module: Rc::new(root.build()),
        }
    }
}
