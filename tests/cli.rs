//! End-to-end runs of the `rgaf` binary on a three node graph with two
//! assemblies.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const GRAPH: &str = "H\tVN:Z:1.0
S\ts1\tACGTACGTAC\tLN:i:10\tSN:Z:chr1\tSO:i:0\tSR:i:0
S\ts2\tACGTACGTACGTACGTACGT\tLN:i:20\tSN:Z:chr1\tSO:i:10\tSR:i:0
S\ts3\tACGTACGTACGTACGTACGTACGTACGTAC\tLN:i:30\tSN:Z:b#chr1\tSO:i:0\tSR:i:1
L\ts1\t+\ts2\t+\t0M\tSR:i:0
L\ts2\t+\ts3\t+\t0M\tSR:i:1
";

const GAF_A: &str = "S\ts1\tACGTACGTAC\tLN:i:10\tSN:Z:chr1\tSO:i:0\tSR:i:0\tdc:f:1
S\ts2\tACGTACGTACGTACGTACGT\tLN:i:20\tSN:Z:chr1\tSO:i:10\tSR:i:0\tdc:f:1
S\ts3\tACGTACGTACGTACGTACGTACGTACGTAC\tLN:i:30\tSN:Z:b#chr1\tSO:i:0\tSR:i:1\tdc:f:0
L\ts1\t+\ts2\t+\t0M\tSR:i:0\tdc:i:1
L\ts2\t+\ts3\t+\t0M\tSR:i:1\tdc:i:0
";

const GAF_B: &str = "S\ts1\tACGTACGTAC\tLN:i:10\tSN:Z:chr1\tSO:i:0\tSR:i:0\tdc:f:0
S\ts2\tACGTACGTACGTACGTACGT\tLN:i:20\tSN:Z:chr1\tSO:i:10\tSR:i:0\tdc:f:2
S\ts3\tACGTACGTACGTACGTACGTACGTACGTAC\tLN:i:30\tSN:Z:b#chr1\tSO:i:0\tSR:i:1\tdc:f:1.5
L\ts1\t+\ts2\t+\t0M\tSR:i:0\tdc:i:0
L\ts3\t-\ts2\t-\t0M\tSR:i:1\tdc:i:2
";

const NODEMAT: &str = "nodeid\ta\tb\ns1\t1\t0\ns2\t1\t1\ns3\t0\t1\n";
const NODECOL: &str = "nodeid\tcolnode\ns1\ta\ns2\ta,b\ns3\tb\n";
const CATEGORIES: &str = "core\tdispensable\tprivate\n20\t0\t40\n1\t0\t2\n";

fn fixture(gaf_b: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("g.gfa"), GRAPH).unwrap();
    fs::write(dir.path().join("a_g.gaf"), GAF_A).unwrap();
    fs::write(dir.path().join("b_g.gaf"), gaf_b).unwrap();
    dir
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

fn rgaf() -> Command {
    Command::cargo_bin("rgaf").unwrap()
}

#[test]
fn whole_pipeline() {
    let dir = fixture(GAF_B);
    let out = dir.path().join("out");

    rgaf()
        .arg("run")
        .arg("-g")
        .arg(dir.path().join("g.gfa"))
        .args(["-a", "a", "b"])
        .arg("-d")
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(NODEMAT, read(out.join("g_nodemat.tsv")));
    assert_eq!(NODECOL, read(out.join("g_nodecol.tsv")));
    assert_eq!(CATEGORIES, read(out.join("g_categorize.tsv")));
    assert_eq!(
        "parent_node child_node a b\ns1 s2 1 0\ns2 s3 0 1\n",
        read(out.join("g_edge_use.tsv"))
    );
    assert_eq!(
        "s1\t10\tchr1\t0\t0\ns2\t20\tchr1\t10\t0\ns3\t30\tb#chr1\t0\t1\n",
        read(out.join("g_len.tsv"))
    );
}

#[test]
fn stage_by_stage() {
    let dir = fixture(GAF_B);
    let d = dir.path();

    rgaf()
        .arg("gfa")
        .arg("-g")
        .arg(d.join("g.gfa"))
        .args(["-p", "g"])
        .arg("-o")
        .arg(d)
        .assert()
        .success();
    assert_eq!(2, read(d.join("g_link.tsv")).lines().count());

    rgaf()
        .args(["gaf", "-g", "g", "-a", "a", "b"])
        .arg("-d")
        .arg(d)
        .arg("-o")
        .arg(d.join("coverage_use"))
        .assert()
        .success();
    assert_eq!(
        "nodeid nodelen start_chromo start_pos rrank a b\n\
         s1 10 chr1 0 0 1 0\n\
         s2 20 chr1 10 0 1 2\n\
         s3 30 b#chr1 0 1 0 1.5\n",
        read(d.join("coverage_use").join("g_coverage.tsv"))
    );

    rgaf()
        .arg("mtx")
        .arg("-c")
        .arg(d.join("coverage_use").join("g_coverage.tsv"))
        .arg("-n")
        .arg(d.join("g_len.tsv"))
        .args(["-a", "a", "b", "-p", "g"])
        .arg("-o")
        .arg(d)
        .assert()
        .success();
    assert_eq!(NODEMAT, read(d.join("g_nodemat.tsv")));
    assert_eq!(NODECOL, read(d.join("g_nodecol.tsv")));

    rgaf()
        .arg("cat")
        .arg("-m")
        .arg(d.join("g_nodemat.tsv"))
        .arg("-l")
        .arg(d.join("g_len.tsv"))
        .args(["-p", "g"])
        .arg("-o")
        .arg(d)
        .assert()
        .success();
    assert_eq!(CATEGORIES, read(d.join("g_categorize.tsv")));
}

#[test]
fn rank_fills_in_unaligned_node() {
    // b never covers s3, but s3 came from b when the graph was built
    let gaf_b = GAF_B.replace("dc:f:1.5", "dc:f:0");
    let dir = fixture(&gaf_b);
    let out = dir.path().join("out");

    rgaf()
        .arg("run")
        .arg("-g")
        .arg(dir.path().join("g.gfa"))
        .args(["-a", "a", "b"])
        .arg("-d")
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(NODEMAT, read(out.join("g_nodemat.tsv")));
}

#[test]
fn missing_coverage_tag_writes_nothing() {
    let gaf_b = GAF_B.replace("dc:f:1.5", "dc:f:");
    let dir = fixture(&gaf_b);
    let out = dir.path().join("coverage_use");

    rgaf()
        .args(["gaf", "-g", "g", "-a", "a", "b"])
        .arg("-d")
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--cov"));

    assert!(!out.join("g_coverage.tsv").exists());
    assert!(!out.join("g_edge_use.tsv").exists());
}

#[test]
fn missing_alignment_file() {
    let dir = fixture(GAF_B);

    rgaf()
        .args(["gaf", "-g", "g", "-a", "a", "b", "c"])
        .arg("-d")
        .arg(dir.path())
        .arg("-o")
        .arg(dir.path().join("coverage_use"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("c_g.gaf"));
}

#[test]
fn coverage_columns_must_match_assemblies() {
    let dir = fixture(GAF_B);
    let d = dir.path();

    rgaf()
        .args(["gaf", "-g", "g", "-a", "a", "b"])
        .arg("-d")
        .arg(d)
        .arg("-o")
        .arg(d)
        .assert()
        .success();
    rgaf()
        .arg("gfa")
        .arg("-g")
        .arg(d.join("g.gfa"))
        .args(["-p", "g"])
        .arg("-o")
        .arg(d)
        .assert()
        .success();

    rgaf()
        .arg("mtx")
        .arg("-c")
        .arg(d.join("g_coverage.tsv"))
        .arg("-n")
        .arg(d.join("g_len.tsv"))
        .args(["-a", "a", "b", "c", "-p", "g"])
        .arg("-o")
        .arg(d)
        .assert()
        .failure()
        .stderr(predicate::str::contains("columns"));

    assert!(!d.join("g_nodemat.tsv").exists());
}

#[test]
fn dangling_node() {
    let dir = TempDir::new().unwrap();
    let d = dir.path();
    fs::write(d.join("m.tsv"), "nodeid\ta\ns1\t1\ns9\t1\n").unwrap();
    fs::write(d.join("len.tsv"), "s1\t10\tchr1\t0\t0\n").unwrap();

    rgaf()
        .arg("cat")
        .arg("-m")
        .arg(d.join("m.tsv"))
        .arg("-l")
        .arg(d.join("len.tsv"))
        .args(["-p", "x"])
        .arg("-o")
        .arg(d)
        .assert()
        .failure()
        .stderr(predicate::str::contains("s9"));
}

#[test]
fn missing_graph() {
    let dir = TempDir::new().unwrap();

    rgaf()
        .arg("gfa")
        .arg("-g")
        .arg(dir.path().join("nope.gfa"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn stages_create_their_output_directory() {
    let dir = fixture(GAF_B);
    let d = dir.path();
    let out = d.join("new").join("tables");

    rgaf()
        .arg("gfa")
        .arg("-g")
        .arg(d.join("g.gfa"))
        .args(["-p", "g"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    rgaf()
        .args(["gaf", "-g", "g", "-a", "a", "b"])
        .arg("-d")
        .arg(d)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let mtx_out = d.join("mtx").join("out");
    rgaf()
        .arg("mtx")
        .arg("-c")
        .arg(out.join("g_coverage.tsv"))
        .arg("-n")
        .arg(out.join("g_len.tsv"))
        .args(["-a", "a", "b", "-p", "g"])
        .arg("-o")
        .arg(&mtx_out)
        .assert()
        .success();
    assert_eq!(NODEMAT, read(mtx_out.join("g_nodemat.tsv")));

    let cat_out = d.join("cat").join("out");
    rgaf()
        .arg("cat")
        .arg("-m")
        .arg(mtx_out.join("g_nodemat.tsv"))
        .arg("-l")
        .arg(out.join("g_len.tsv"))
        .args(["-p", "g"])
        .arg("-o")
        .arg(&cat_out)
        .assert()
        .success();
    assert_eq!(CATEGORIES, read(cat_out.join("g_categorize.tsv")));
}

#[test]
fn inverted_link_does_not_abort() {
    let gaf_b = format!("{}L\ts3\t+\ts2\t-\t0M\tSR:i:1\tdc:i:0\n", GAF_B);
    let dir = fixture(&gaf_b);
    let out = dir.path().join("out");

    rgaf()
        .arg("run")
        .arg("-g")
        .arg(dir.path().join("g.gfa"))
        .args(["-a", "a", "b"])
        .arg("-d")
        .arg(dir.path())
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(
        "parent_node child_node a b\ns1 s2 1 0\ns2 s3 0 1\n",
        read(out.join("g_edge_use.tsv"))
    );
}
