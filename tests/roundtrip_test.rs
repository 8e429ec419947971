use vcdedit::{
    data::*,
    load::{load_file, parse},
    save::save,
};
use pretty_assertions::assert_eq;
use test_case::test_case;

/// Everything that is written to a file, per variable.
fn structure(vcd: &Vcd) -> Vec<(String, String, String, u32, Option<i64>, Option<i64>, Vec<VcdWave>)> {
    vcd.variables().iter()
        .map(|v| (
            path_label(vcd, v),
            v.alias.clone(),
            v.var_type.clone(),
            v.size,
            v.msb,
            v.lsb,
            v.waves.clone(),
        ))
        .collect()
}

#[test_case("demos/counter.vcd")]
#[test_case("demos/header_only.vcd")]
fn round_trip_file_test(file_name: &str) {
    let original = load_file(file_name).unwrap();
    let text = save(&original);
    let decoded = parse(&text).unwrap();

    assert_eq!(original.date, decoded.date);
    assert_eq!(original.version, decoded.version);
    assert_eq!(original.timescale, decoded.timescale);
    assert_eq!(structure(&original), structure(&decoded));

    // a second pass is stable
    assert_eq!(text, save(&decoded));
}


#[test]
fn round_trip_timescales_test() {
    for unit in ["s", "ms", "us", "ns", "ps", "fs", "as", "zs", "ys"] {
        for magnitude in [1, 10, 100, 1000, 3000, 12345] {
            let text = format!("$timescale {}{} $end", magnitude, unit);
            let vcd = parse(&text).unwrap();
            let again = parse(&save(&vcd)).unwrap();

            assert_eq!(vcd.timescale, again.timescale, "{}", text);
        }
    }
}


#[test]
fn round_trip_built_document_test() {
    let wide = VcdVariable::new(0, "wide", "w", "wire", 70)
        .with_waves(vec![
            VcdWave::new(3, WaveValue::from(rug::Integer::from(1) << 69u32)),
            VcdWave::new(9, WaveValue::Sentinel("z".to_string())),
        ]);
    let flag = VcdVariable::new(1, "flag", "f", "reg", 1)
        .with_waves(vec![VcdWave::new(3, 1u32), VcdWave::new(4, 0u32)]);
    let root = VcdModule::new("")
        .with_variable(flag)
        .with_submodule(VcdModule::new("chip").with_variable(wide));
    let original = Vcd::new(1e-15, root);

    let decoded = parse(&save(&original)).unwrap();

    assert_eq!(structure(&original)[0].6, structure(&decoded)[0].6);
    assert_eq!(vec!["flag", "chip.wide"],
        decoded.variables().iter().map(|v| path_label(&decoded, v)).collect::<Vec<_>>());
    assert_eq!(Some((69, 0)), decoded.variables()[1].msb.zip(decoded.variables()[1].lsb));
    assert_eq!(original.variables()[1].waves, decoded.variables()[1].waves);
}
