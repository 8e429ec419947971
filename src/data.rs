pub mod query;
pub mod timescale;
pub mod tree;

pub use query::*;
pub use timescale::*;
pub use tree::*;

use crate::formatting::Format;

use chrono::{DateTime, Utc};
use rug::Integer;
use std::rc::Rc;

//
// Types
//

/// Value carried by one value change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WaveValue {
    /// Fully defined sample of any width.
    Numeric(Integer),

    /// Undefined, high impedance, partially defined vector or real value, kept as text.
    Sentinel(String),
}

impl From<u32> for WaveValue {
    fn from(v: u32) -> Self {
        WaveValue::Numeric(Integer::from(v))
    }
}

impl From<Integer> for WaveValue {
    fn from(v: Integer) -> Self {
        WaveValue::Numeric(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcdWave {
    pub tick: u64,
    pub value: WaveValue,
}

impl VcdWave {
    pub fn new(tick: u64, value: impl Into<WaveValue>) -> Self {
        Self {
            tick,
            value: value.into(),
        }
    }
}

/// A wave seen from a cursor position.
///
/// `previous` and `next` are only filled when the wave starts exactly at the cursor, i.e. the
/// cursor sits on an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedWave {
    pub wave: VcdWave,
    pub previous: Option<WaveValue>,
    pub next: Option<WaveValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcdVariable {
    /// Identity assigned by the editor, independent of `alias`.
    pub id: usize,
    pub name: String,
    /// Identifier code used in the value change section.
    pub alias: String,
    pub var_type: String,
    /// Width in bits.
    pub size: u32,
    pub msb: Option<i64>,
    pub lsb: Option<i64>,
    /// Value changes with strictly increasing ticks.
    pub waves: Vec<VcdWave>,
    pub format: Format,
    pub color: Option<String>,
}

impl VcdVariable {
    pub fn new(
        id: usize,
        name: impl Into<String>,
        alias: impl Into<String>,
        var_type: impl Into<String>,
        size: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            alias: alias.into(),
            var_type: var_type.into(),
            size,
            msb: None,
            lsb: None,
            waves: vec![],
            format: Format::for_size(size),
            color: None,
        }
    }

    pub fn with_range(mut self, msb: i64, lsb: i64) -> Self {
        self.msb = Some(msb);
        self.lsb = Some(lsb);
        self
    }

    pub fn with_waves(mut self, waves: Vec<VcdWave>) -> Self {
        self.waves = waves;
        self
    }

    pub fn first_tick(&self) -> Option<u64> {
        self.waves.first().map(|w| w.tick)
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.waves.last().map(|w| w.tick)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VcdModule {
    pub name: String,
    pub variables: Vec<Rc<VcdVariable>>,
    pub submodules: Vec<Rc<VcdModule>>,
}

impl VcdModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, variable: VcdVariable) -> Self {
        self.variables.push(Rc::new(variable));
        self
    }

    pub fn with_submodule(mut self, module: VcdModule) -> Self {
        self.submodules.push(Rc::new(module));
        self
    }
}

/// One waveform capture.
///
/// `root_module` is an unnamed container: its variables were declared outside of any scope and
/// its submodules are the top level scopes.
#[derive(Debug, Clone, PartialEq)]
pub struct Vcd {
    pub date: Option<DateTime<Utc>>,
    pub version: Option<String>,
    /// Seconds per tick.
    pub timescale: f64,
    pub root_module: Rc<VcdModule>,
}

impl Vcd {
    pub fn new(timescale: f64, root_module: VcdModule) -> Self {
        Self {
            date: None,
            version: None,
            timescale,
            root_module: Rc::new(root_module),
        }
    }

    /// Snapshot sharing everything but the module tree.
    pub fn with_root(&self, root_module: Rc<VcdModule>) -> Self {
        Self {
            root_module,
            ..self.clone()
        }
    }

    pub fn variables(&self) -> Vec<Rc<VcdVariable>> {
        flatten_variables(&self.root_module)
    }
}
