//! Integration tests for [`commands::run`]

#[path = "../common/mod.rs"]
mod common;

use bamscan_core::commands;
use clap::Parser as _;
use common::standard_bam;
use indoc::indoc;
use serde_json::Value;
use std::fs;
use uuid::Uuid;

fn run_to_string(args: &[&str]) -> String {
    let cli = commands::Cli::parse_from(args.iter().copied());
    let mut output = Vec::new();
    commands::run(cli, &mut output).expect("no error");
    String::from_utf8(output).expect("Invalid UTF-8")
}

#[test]
fn run_references() {
    let temp = standard_bam();
    let bam = temp.bam.to_str().expect("utf8 path");
    assert_eq!(run_to_string(&["", "references", bam]), "chrI\t10000\nchrII\t5000\n");
}

#[test]
fn run_extract_region_tsv() {
    let temp = standard_bam();
    let bam = temp.bam.to_str().expect("utf8 path");
    let index = temp.index.to_str().expect("utf8 path");
    let output = run_to_string(&[
        "",
        "extract",
        bam,
        "--index",
        index,
        "--region",
        "chrI:100-200",
        "--min-mapq",
        "20",
    ]);
    assert_eq!(
        output,
        indoc! {"
            read_id\tcontig\tstart\talignment_type\tfrag_len\tstrand
            a\tchrI\t90\tprimary_forward\t60\t+
            b\tchrI\t150\tprimary_reverse\t50\t-
        "}
    );
}

#[test]
fn run_extract_whole_file_json_template() {
    let temp = standard_bam();
    let bam = temp.bam.to_str().expect("utf8 path");
    let output = run_to_string(&[
        "",
        "extract",
        bam,
        "--require-proper-pair",
        "--length-mode",
        "template",
        "--format",
        "json",
    ]);
    let lines: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json"))
        .collect();
    assert_eq!(
        lines,
        vec![serde_json::json!({
            "read_id": "i",
            "contig": "chrII",
            "start": 100,
            "alignment_type": "primary_reverse",
            "frag_len": 300,
            "strand": "-"
        })]
    );
}

#[test]
fn run_extract_with_regions_json() {
    let temp = standard_bam();
    let bam = temp.bam.to_str().expect("utf8 path");
    let regions = std::env::temp_dir().join(format!("{}.json", Uuid::new_v4()));
    fs::write(
        &regions,
        indoc! {r#"
            [
                {"tid": 1, "start": 0, "end": 5000},
                {"tid": 0, "start": 1990, "end": 2005}
            ]
        "#},
    )
    .expect("no error");
    let output = run_to_string(&[
        "",
        "extract",
        bam,
        "--regions-json",
        regions.to_str().expect("utf8 path"),
        "--region",
        "chrI:95-100",
    ]);
    fs::remove_file(&regions).expect("no error");
    let read_ids: Vec<&str> = output
        .lines()
        .skip(1)
        .filter_map(|l| l.split('\t').next())
        .collect();
    assert_eq!(read_ids, ["a", "g", "h", "i"]);
}

#[test]
fn run_extract_unknown_contig_fails() {
    let temp = standard_bam();
    let bam = temp.bam.to_str().expect("utf8 path");
    let cli = commands::Cli::parse_from(["", "extract", bam, "--region", "chrX:1-10"]);
    let mut output = Vec::new();
    assert!(commands::run(cli, &mut output).is_err());
}

#[test]
fn run_references_missing_index_fails() {
    let temp = standard_bam();
    fs::remove_file(&temp.index).expect("no error");
    let cli = commands::Cli::parse_from(["", "references", temp.bam.to_str().expect("utf8 path")]);
    let mut output = Vec::new();
    assert!(commands::run(cli, &mut output).is_err());
}
