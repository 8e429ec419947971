use crate::data::*;
use crate::error::*;

use chrono::SecondsFormat;
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

const LINE_END: &str = "\r\n";

fn declare_module(module: &VcdModule, lines: &mut Vec<String>) {
    for var in module.variables.iter() {
        lines.push(declaration(var));
    }

    for sub in module.submodules.iter() {
        lines.push(format!("$scope module {} $end", sub.name));
        declare_module(sub, lines);
        lines.push("$upscope $end".to_string());
    }
}

fn declaration(var: &VcdVariable) -> String {
    if var.size > 1 {
        let msb = var.msb.unwrap_or(var.size as i64 - 1);
        let lsb = var.lsb.unwrap_or(0);
        format!("$var {} {} {} {} [{}:{}] $end", var.var_type, var.size, var.alias, var.name, msb, lsb)
    } else {
        format!("$var {} {} {} {} $end", var.var_type, var.size, var.alias, var.name)
    }
}

/// Value change line for one sample of `var`.
fn value_line(var: &VcdVariable, value: &WaveValue) -> String {
    match value {
        WaveValue::Sentinel(s) => format!("{} {}", s, var.alias),
        // a 1-bit variable holding a wider number still needs the vector form to be read back
        WaveValue::Numeric(n) if var.size == 1 && *n <= 1 => format!("{}{}", n, var.alias),
        WaveValue::Numeric(n) => format!("b{} {}", n.to_string_radix(2), var.alias),
    }
}

/// Value change lines grouped by tick, in declaration order within a tick.
fn changes_by_tick(module: &VcdModule) -> BTreeMap<u64, Vec<String>> {
    let mut rv: BTreeMap<u64, Vec<String>> = BTreeMap::new();

    for var in flatten_variables(module) {
        for wave in var.waves.iter() {
            rv.entry(wave.tick)
                .or_default()
                .push(value_line(&var, &wave.value));
        }
    }

    rv
}

/// Serialize a document to VCD text.
///
/// View state (`id`, `format`, `color`) is not written. Variables without waves only show up in
/// the declarations.
pub fn save(vcd: &Vcd) -> String {
    let mut lines = Vec::new();

    if let Some(date) = vcd.date {
        lines.push("$date".to_string());
        lines.push(format!("\t{}", date.to_rfc3339_opts(SecondsFormat::Millis, true)));
        lines.push("$end".to_string());
    }

    if let Some(version) = vcd.version.as_ref() {
        lines.push("$version".to_string());
        lines.push(format!("\t{}", version));
        lines.push("$end".to_string());
    }

    lines.push("$timescale".to_string());
    lines.push(format!("\t{}", timescale_to_string(vcd.timescale)));
    lines.push("$end".to_string());

    declare_module(&vcd.root_module, &mut lines);
    lines.push("$enddefinitions $end".to_string());

    let mut changes = changes_by_tick(&vcd.root_module).into_iter();
    let num_ticks = changes.len();

    if let Some((min_tick, initial)) = changes.next() {
        lines.push(format!("#{}", min_tick));
        lines.push("$dumpvars".to_string());
        lines.extend(initial);
        lines.push("$end".to_string());

        for (tick, values) in changes {
            lines.push(format!("#{}", tick));
            lines.extend(values);
        }
    }

    info!("Encoded {} lines covering {} ticks", lines.len(), num_ticks);

    lines.join(LINE_END)
}

pub fn save_file(vcd: &Vcd, filename: impl AsRef<Path>) -> Result<()> {
    std::fs::write(filename, save(vcd))?;
    Ok(())
}
