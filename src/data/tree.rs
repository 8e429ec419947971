//! Queries and copy-on-write transforms over the module tree.
//!
//! Variables handed out by these functions are clones of the `Rc`s stored in the tree, so they
//! keep the identity of the variable they were found through.

use super::*;

/// All variables of a module subtree in pre-order: own variables first, then each submodule's
/// variables, recursively.
pub fn flatten_variables(module: &VcdModule) -> Vec<Rc<VcdVariable>> {
    let mut rv = Vec::new();
    collect_variables(module, &mut rv);
    rv
}

fn collect_variables(module: &VcdModule, into: &mut Vec<Rc<VcdVariable>>) {
    into.extend(module.variables.iter().cloned());

    for sub in module.submodules.iter() {
        collect_variables(sub, into);
    }
}

/// Smallest first tick of all variables. `None` if no variable has a wave.
pub fn min_tick(module: &VcdModule) -> Option<u64> {
    flatten_variables(module).iter()
        .filter_map(|var| var.first_tick())
        .min()
}

/// Largest last tick of all variables. `None` if no variable has a wave.
pub fn max_tick(module: &VcdModule) -> Option<u64> {
    flatten_variables(module).iter()
        .filter_map(|var| var.last_tick())
        .max()
}

/// Names of the modules from below the document root down to the module holding `variable`.
///
/// The search is by identity. A variable that is not part of the document yields an empty path.
pub fn ancestor_modules_of(document: &Vcd, variable: &Rc<VcdVariable>) -> Vec<String> {
    let mut path = Vec::new();

    if find_path(&document.root_module, variable, &mut path) {
        path
    } else {
        vec![]
    }
}

fn find_path(module: &VcdModule, variable: &Rc<VcdVariable>, path: &mut Vec<String>) -> bool {
    if module.variables.iter().any(|var| Rc::ptr_eq(var, variable)) {
        return true;
    }

    for sub in module.submodules.iter() {
        path.push(sub.name.clone());
        if find_path(sub, variable, path) {
            return true;
        }
        path.pop();
    }

    false
}

/// Dotted hierarchical name, e.g. `top.cpu.clk`.
pub fn path_label(document: &Vcd, variable: &Rc<VcdVariable>) -> String {
    let mut parts = ancestor_modules_of(document, variable);
    parts.push(variable.name.clone());
    parts.join(".")
}

/// Look up a variable by its dotted hierarchical name.
pub fn find_by_path(document: &Vcd, path: &str) -> Option<Rc<VcdVariable>> {
    let mut parts: Vec<&str> = path.split('.').collect();
    let name = parts.pop()?;

    let mut module = &document.root_module;
    for part in parts {
        module = module.submodules.iter().find(|sub| sub.name == part)?;
    }

    module.variables.iter()
        .find(|var| var.name == name)
        .cloned()
}

/// Return a copy of `list` with the element at `from` moved to position `to`.
///
/// Applying it with the same indices to several parallel lists keeps them aligned. Missing or
/// out of range indices leave the list unchanged.
pub fn reorder_aligned<T: Clone>(list: &[T], from: Option<usize>, to: Option<usize>) -> Vec<T> {
    let mut rv = list.to_vec();

    if let (Some(from), Some(to)) = (from, to) {
        if from < rv.len() && to < rv.len() {
            let item = rv.remove(from);
            rv.insert(to, item);
        }
    }

    rv
}

/// Build a new tree in which `old` is replaced by `new`.
///
/// Only the modules on the path to `old` are copied; all other subtrees are shared with the
/// source tree. Returns `None` if `old` is not part of the tree.
pub fn replace_variable(
    module: &Rc<VcdModule>,
    old: &Rc<VcdVariable>,
    new: Rc<VcdVariable>,
) -> Option<Rc<VcdModule>> {
    if let Some(pos) = module.variables.iter().position(|var| Rc::ptr_eq(var, old)) {
        let mut copy = VcdModule::clone(module);
        copy.variables[pos] = new;
        return Some(Rc::new(copy));
    }

    for (i, sub) in module.submodules.iter().enumerate() {
        if let Some(replaced) = replace_variable(sub, old, new.clone()) {
            let mut copy = VcdModule::clone(module);
            copy.submodules[i] = replaced;
            return Some(Rc::new(copy));
        }
    }

    None
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn var(id: usize, name: &str, ticks: &[u64]) -> VcdVariable {
        let waves = ticks.iter()
            .map(|t| VcdWave::new(*t, 0u32))
            .collect();
        VcdVariable::new(id, name, format!("{}", id), "wire", 1).with_waves(waves)
    }

    fn make_test_doc() -> Vcd {
        let alu = VcdModule::new("alu")
            .with_variable(var(2, "carry", &[3, 9]));
        let cpu = VcdModule::new("cpu")
            .with_variable(var(1, "pc", &[0, 4]))
            .with_submodule(alu);
        let mem = VcdModule::new("mem")
            .with_variable(var(3, "we", &[2, 20]));
        let top = VcdModule::new("top")
            .with_variable(var(0, "clk", &[1, 5]))
            .with_submodule(cpu)
            .with_submodule(mem);

        Vcd::new(1e-9, VcdModule::new("").with_submodule(top))
    }

    fn names(vars: &[Rc<VcdVariable>]) -> Vec<&str> {
        vars.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_flatten_preorder() {
        let doc = make_test_doc();
        let first = flatten_variables(&doc.root_module);
        let second = flatten_variables(&doc.root_module);

        assert_eq!(vec!["clk", "pc", "carry", "we"], names(&first));
        assert_eq!(names(&first), names(&second));
        assert!(first.iter().zip(second.iter()).all(|(a, b)| Rc::ptr_eq(a, b)));
    }

    #[test]
    fn test_tick_range() {
        let doc = make_test_doc();
        assert_eq!(Some(0), min_tick(&doc.root_module));
        assert_eq!(Some(20), max_tick(&doc.root_module));

        let empty = VcdModule::new("empty")
            .with_variable(VcdVariable::new(0, "nothing", "!", "wire", 1));
        assert_eq!(None, min_tick(&empty));
        assert_eq!(None, max_tick(&empty));
        assert_eq!(None, min_tick(&VcdModule::new("bare")));
        assert_eq!(None, max_tick(&VcdModule::new("bare")));
    }

    #[test]
    fn test_ancestors() {
        let doc = make_test_doc();
        let vars = doc.variables();

        assert_eq!(vec!["top", "cpu", "alu"], ancestor_modules_of(&doc, &vars[2]));
        assert_eq!("top.mem.we", path_label(&doc, &vars[3]));

        // equal by value, but not part of the tree
        let stranger = Rc::new(VcdVariable::clone(&vars[2]));
        assert!(ancestor_modules_of(&doc, &stranger).is_empty());
    }

    #[test]
    fn test_find_by_path() {
        let doc = make_test_doc();
        let found = find_by_path(&doc, "top.cpu.alu.carry").unwrap();

        assert!(Rc::ptr_eq(&doc.variables()[2], &found));
        assert!(find_by_path(&doc, "top.alu.carry").is_none());
        assert!(find_by_path(&doc, "").is_none());
    }

    #[test]
    fn test_reorder_aligned() {
        let list = vec!['a', 'b', 'c', 'd', 'e'];
        let labels = vec![0, 1, 2, 3, 4];

        assert_eq!(vec!['a', 'c', 'd', 'b', 'e'], reorder_aligned(&list, Some(1), Some(3)));
        assert_eq!(vec!['d', 'a', 'b', 'c', 'e'], reorder_aligned(&list, Some(3), Some(0)));

        let moved = reorder_aligned(&list, Some(4), Some(1));
        let moved_labels = reorder_aligned(&labels, Some(4), Some(1));
        for (c, i) in moved.iter().zip(moved_labels.iter()) {
            assert_eq!(list[*i], *c);
        }
    }

    #[test]
    fn test_reorder_noop() {
        let list = vec![1, 2, 3];

        assert_eq!(list, reorder_aligned(&list, None, Some(1)));
        assert_eq!(list, reorder_aligned(&list, Some(0), None));
        assert_eq!(list, reorder_aligned(&list, Some(3), Some(0)));
        assert_eq!(list, reorder_aligned(&list, Some(0), Some(7)));
        assert_eq!(list, reorder_aligned(&list, Some(2), Some(2)));
    }

    #[test]
    fn test_replace_variable_shares_untouched() {
        let doc = make_test_doc();
        let vars = doc.variables();

        let mut recolored = VcdVariable::clone(&vars[2]);
        recolored.color = Some("#ff0000".to_string());
        let new_root = replace_variable(&doc.root_module, &vars[2], Rc::new(recolored)).unwrap();

        let top_old = &doc.root_module.submodules[0];
        let top_new = &new_root.submodules[0];
        assert!(!Rc::ptr_eq(&doc.root_module, &new_root));
        assert!(!Rc::ptr_eq(&top_old.submodules[0], &top_new.submodules[0]));
        // mem is off the edited path
        assert!(Rc::ptr_eq(&top_old.submodules[1], &top_new.submodules[1]));
        assert!(Rc::ptr_eq(&top_old.variables[0], &top_new.variables[0]));

        let new_vars = flatten_variables(&new_root);
        assert_eq!(Some("#ff0000".to_string()), new_vars[2].color);
        assert_eq!(None, vars[2].color);

        let stranger = Rc::new(VcdVariable::new(9, "x", "x", "wire", 1));
        assert!(replace_variable(&doc.root_module, &stranger, stranger.clone()).is_none());
    }
}
