use crate::data::*;
use crate::error::*;
use crate::formatting::{value_to_string, Format};
use crate::save::save;

use std::rc::Rc;

/// Value of one displayed variable at the cursor.
#[derive(Debug)]
pub struct CursorValue<'a> {
    pub label: &'a str,
    pub variable: &'a Rc<VcdVariable>,
    pub wave: Option<ExtendedWave>,
}

impl CursorValue<'_> {
    /// Value in the variable's display format. On an edge the value before it is shown as well.
    pub fn text(&self) -> String {
        let format = self.variable.format;

        match &self.wave {
            None => "-".to_string(),
            Some(ext) => {
                let now = value_to_string(&ext.wave.value, format);
                match &ext.previous {
                    Some(prev) => format!("{} -> {}", value_to_string(prev, format), now),
                    None => now,
                }
            }
        }
    }
}

/// Editing state around one document.
///
/// Edits never touch a variable in place. They build a new tree via [`replace_variable`], so
/// the display list and the document can be compared to earlier snapshots by pointer.
#[derive(Debug)]
pub struct Session {
    vcd: Vcd,

    /// Root at load time or after the last save
    saved_root: Rc<VcdModule>,

    /// Displayed variables, in display order
    variables: Vec<Rc<VcdVariable>>,

    /// Dotted name of each displayed variable, aligned with `variables`
    labels: Vec<String>,

    /// Tick the cursor is at
    cursor: u64,
}

impl Session {
    pub fn new(vcd: Vcd) -> Self {
        let variables = vcd.variables();
        let labels = variables.iter()
            .map(|var| path_label(&vcd, var))
            .collect();
        let cursor = min_tick(&vcd.root_module).unwrap_or(0);

        Self {
            saved_root: vcd.root_module.clone(),
            vcd,
            variables,
            labels,
            cursor,
        }
    }

    pub fn document(&self) -> &Vcd {
        &self.vcd
    }

    pub fn variables(&self) -> &[Rc<VcdVariable>] {
        &self.variables
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Move a displayed variable, keeping labels aligned.
    pub fn move_variable(&mut self, from: Option<usize>, to: Option<usize>) {
        self.variables = reorder_aligned(&self.variables, from, to);
        self.labels = reorder_aligned(&self.labels, from, to);
    }

    fn update(&mut self, index: usize, edit: impl FnOnce(&mut VcdVariable)) -> Result<()> {
        let old = self.variables.get(index)
            .ok_or(Error::IndexOutOfRange(index, self.variables.len()))?
            .clone();

        let mut new = VcdVariable::clone(&old);
        edit(&mut new);
        if new == *old {
            return Ok(());
        }

        let new = Rc::new(new);
        let root = replace_variable(&self.vcd.root_module, &old, new.clone())
            .ok_or_else(|| Error::NotFound(self.labels[index].clone()))?;

        self.vcd = self.vcd.with_root(root);
        self.variables[index] = new;
        Ok(())
    }

    pub fn set_format(&mut self, index: usize, format: Format) -> Result<()> {
        self.update(index, |var| var.format = format)
    }

    pub fn set_color(&mut self, index: usize, color: Option<String>) -> Result<()> {
        self.update(index, |var| var.color = color)
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    pub fn set_cursor(&mut self, tick: u64) {
        self.cursor = tick;
    }

    /// Move the cursor to the next value change of a displayed variable.
    pub fn next_edge(&mut self, index: usize) -> Option<u64> {
        let tick = next_transition(self.variables.get(index)?, self.cursor)?;
        self.cursor = tick;
        Some(tick)
    }

    /// Move the cursor to the previous value change of a displayed variable.
    pub fn prev_edge(&mut self, index: usize) -> Option<u64> {
        let tick = prev_transition(self.variables.get(index)?, self.cursor)?;
        self.cursor = tick;
        Some(tick)
    }

    pub fn cursor_values(&self) -> Vec<CursorValue<'_>> {
        self.variables.iter()
            .zip(self.labels.iter())
            .map(|(variable, label)| CursorValue {
                label,
                variable,
                wave: extended_wave_at(variable, self.cursor),
            })
            .collect()
    }

    /// Whether the document differs from the one loaded or last saved.
    pub fn is_modified(&self) -> bool {
        !Rc::ptr_eq(&self.saved_root, &self.vcd.root_module)
    }

    pub fn save(&mut self) -> String {
        self.saved_root = self.vcd.root_module.clone();
        save(&self.vcd)
    }
}
