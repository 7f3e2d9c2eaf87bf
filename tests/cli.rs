use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

const HEADER: &str = "Name\tHBA\tHBD\tcomplexity\tNumRings\tRTB\tTPSA\tlogP\tMR\tMW\tCsp3\tfmf\tqed";
const BENZENE_ROW: &str = "benzene\t0\t0\t0\t1\t0\t0.0\t1.69\t26.44\t78.11\t0.0\t1.0\t0.443";
const ETHANOL_ROW: &str = "ethanol\t1\t1\t2\t0\t0\t20.23\t-0.0\t12.76\t46.07\t1.0\t0.0\t0.407";

const LIBRARY: &[&str] = &[
    "CCO\tethanol",
    "c1ccccc1\tbenzene",
    "Cc1ccccc1\ttoluene",
    "CC(=O)O\tacetic_acid",
    "c1ccncc1\tpyridine",
    "CCCC\tbutane",
    "CC(=O)Nc1ccc(O)cc1\tparacetamol",
    "C1CC\tbroken",
    "O=C(O)c1ccccc1OC(C)=O\taspirin",
    "CN1CCC[C@H]1c1cccnc1\tnicotine",
];

fn physchem(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_physchem"));
    cmd.args(args).env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    physchem(args).output().expect("run CLI")
}

fn write_input(dir: &Path, name: &str, lines: &[&str]) -> String {
    let path = dir.join(name);
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "cli exited with {}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn computes_a_row_per_structure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "in.smi", &["c1ccccc1\tbenzene", "CCO\tethanol"]);
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", &input, "-o", out.to_str().unwrap()]);
    assert_success(&output);

    let table = fs::read_to_string(&out).unwrap();
    assert_eq!(table, format!("{HEADER}\n{BENZENE_ROW}\n{ETHANOL_ROW}\n"));
    assert!(output.stdout.is_empty());
}

#[test]
fn empty_input_writes_only_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.smi");
    fs::write(&input, "").unwrap();
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);
    assert_success(&output);
    assert_eq!(fs::read_to_string(&out).unwrap(), format!("{HEADER}\n"));
}

#[test]
fn unparsable_structures_are_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "in.smi",
        &["CCO\tethanol", "C1CC\tbroken", "c1ccccc1\tbenzene"],
    );
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", &input, "-o", out.to_str().unwrap()]);
    assert_success(&output);

    let table = fs::read_to_string(&out).unwrap();
    assert_eq!(table, format!("{HEADER}\n{ETHANOL_ROW}\n{BENZENE_ROW}\n"));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "smiles C1CC cannot be parsed (broken)\n"
    );
}

#[test]
fn worker_count_does_not_change_the_output() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<&str> = LIBRARY.iter().copied().cycle().take(537).collect();
    let input = write_input(dir.path(), "in.smi", &lines);
    let serial = dir.path().join("serial.tsv");
    let parallel = dir.path().join("parallel.tsv");

    let a = run(&["-i", &input, "-o", serial.to_str().unwrap(), "-c", "1"]);
    let b = run(&[
        "-i",
        &input,
        "-o",
        parallel.to_str().unwrap(),
        "-c",
        "4",
        "--chunk-size",
        "7",
    ]);
    assert_success(&a);
    assert_success(&b);

    let serial = fs::read(&serial).unwrap();
    let parallel = fs::read(&parallel).unwrap();
    assert_eq!(serial, parallel);

    let rows = String::from_utf8(serial).unwrap().lines().count() - 1;
    let broken = lines.iter().filter(|l| l.ends_with("broken")).count();
    assert_eq!(rows, lines.len() - broken);
    assert_eq!(a.stderr, b.stderr);
}

#[test]
fn window_flags_select_lines() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "in.smi", &LIBRARY[..6]);
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", &input, "-o", out.to_str().unwrap(), "-p", "2", "-l", "1"]);
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        format!("{HEADER}\n{BENZENE_ROW}\n")
    );

    let output = run(&["-i", &input, "-o", out.to_str().unwrap(), "--startpos", "5"]);
    assert_success(&output);
    let names: Vec<String> = fs::read_to_string(&out)
        .unwrap()
        .lines()
        .skip(1)
        .map(|l| l.split('\t').next().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["pyridine", "butane"]);
}

#[test]
fn custom_separator() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "in.csv", &["c1ccccc1,benzene", "CCO,ethanol"]);
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", &input, "-o", out.to_str().unwrap(), "-s", ","]);
    assert_success(&output);
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        format!("{HEADER}\n{BENZENE_ROW}\n{ETHANOL_ROW}\n")
    );
}

#[test]
fn structure_without_heavy_atoms_stops_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        dir.path(),
        "in.smi",
        &["CCO\tethanol", "[H][H]\thydrogen", "c1ccccc1\tbenzene"],
    );
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", &input, "-o", out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        format!("{HEADER}\n{ETHANOL_ROW}\n")
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {stderr}");
}

#[test]
fn reads_stdin_and_writes_stdout() {
    let mut child = physchem(&["-i", "-", "-o", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child
        .stdin
        .take()
        .expect("stdin open")
        .write_all(b"c1ccccc1 benzene\n")
        .expect("write stdin");

    let output = child.wait_with_output().expect("read CLI output");
    assert_success(&output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{HEADER}\n{BENZENE_ROW}\n")
    );
}

#[test]
fn verbose_reports_progress_every_thousand_records() {
    let dir = tempfile::tempdir().unwrap();
    let lines = vec!["CCO\tethanol"; 2500];
    let input = write_input(dir.path(), "in.smi", &lines);
    let out = dir.path().join("out.tsv");

    let output = run(&["-i", &input, "-o", out.to_str().unwrap(), "-v", "-c", "2"]);
    assert_success(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\r1000 molecules passed"));
    assert!(stderr.contains("\r2000 molecules passed"));
    assert!(!stderr.contains("3000 molecules passed"));
}

#[test]
fn invalid_parameter_file_fails_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "in.smi", &["CCO\tethanol"]);
    let params = dir.path().join("params.toml");
    fs::write(&params, "this is not toml").unwrap();
    let out = dir.path().join("out.tsv");

    let output = run(&[
        "-i",
        &input,
        "-o",
        out.to_str().unwrap(),
        "--params",
        params.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn missing_required_arguments_fail_with_usage_error() {
    let output = run(&["-o", "out.tsv"]);
    assert_eq!(output.status.code(), Some(2));

    let output = run(&["-i", "in.smi"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.tsv");
    let output = run(&["-i", "/nonexistent/lib.smi", "-o", out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/lib.smi"));
}
